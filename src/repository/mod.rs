// Persistence layer: one trait per entity, implemented against Postgres.
// Handlers and services interact with `Arc<dyn …>` trait objects only, so the
// whole layer can be swapped for in-memory implementations under test.

pub mod topics;
pub mod user_vocab;
pub mod users;
pub mod vocabularies;

pub use topics::{PgTopicRepository, TopicRepository, TopicRepositoryState};
pub use user_vocab::{PgUserVocabularyRepository, UserVocabularyRepository, UserVocabularyRepositoryState};
pub use users::{PgUserRepository, UserRepository, UserRepositoryState};
pub use vocabularies::{PgVocabularyRepository, VocabularyRepository, VocabularyRepositoryState};

use sqlx::PgPool;
use std::sync::Arc;

/// Repositories
///
/// The bundle of per-entity repository handles shared through the
/// application state.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepositoryState,
    pub topics: TopicRepositoryState,
    pub vocab: VocabularyRepositoryState,
    pub user_vocab: UserVocabularyRepositoryState,
}

impl Repositories {
    /// Wires every repository to the same Postgres connection pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            topics: Arc::new(PgTopicRepository::new(pool.clone())),
            vocab: Arc::new(PgVocabularyRepository::new(pool.clone())),
            user_vocab: Arc::new(PgUserVocabularyRepository::new(pool)),
        }
    }
}
