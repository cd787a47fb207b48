// Service layer: the operations exposed to the handler layer, composed from
// the repositories and the credential/token/clock capabilities. Every
// operation returns `Result<_, AppError>`; admin-gated operations take the
// caller's principal explicitly and fail with `AccessDenied` themselves
// rather than relying on routing-level interception.

pub mod auth;
pub mod topics;
pub mod user_vocab;
pub mod users;
pub mod vocab;

pub use auth::AuthService;
pub use topics::TopicService;
pub use user_vocab::UserVocabularyService;
pub use users::UserService;
pub use vocab::VocabularyService;

use crate::{
    clock::ClockState, password::HasherState, repository::Repositories, token::TokenService,
};

/// Services
///
/// The bundle of service handles shared through the application state.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub topics: TopicService,
    pub vocab: VocabularyService,
    pub user_vocab: UserVocabularyService,
}

impl Services {
    pub fn new(
        repos: &Repositories,
        hasher: HasherState,
        tokens: TokenService,
        clock: ClockState,
    ) -> Self {
        Self {
            auth: AuthService::new(
                repos.users.clone(),
                hasher.clone(),
                tokens,
                clock.clone(),
            ),
            users: UserService::new(repos.users.clone(), hasher, clock.clone()),
            topics: TopicService::new(repos.topics.clone(), clock.clone()),
            vocab: VocabularyService::new(
                repos.vocab.clone(),
                repos.topics.clone(),
                clock.clone(),
            ),
            user_vocab: UserVocabularyService::new(
                repos.user_vocab.clone(),
                repos.vocab.clone(),
                repos.users.clone(),
                clock,
            ),
        }
    }
}
