// Shared test harness: in-memory repository implementations that mirror the
// Postgres layer's semantics (soft-delete visibility, AND-composed filters,
// unique-constraint violations surfaced by constraint name) plus a settable
// clock, so the service layer can be exercised end-to-end without a database.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use lexhub::{
    AppError, Clock, Repositories, Services, TokenService,
    filters::{TopicSearchFilter, UserSearchFilter, VocabSearchFilter},
    models::{
        CreateTopicRequest, CreateVocabularyRequest, LearningStatus, Page, PageParams,
        RegisterRequest, Topic, TopicStatus, TopicVocabulary, User, UserRole, UserVocabulary,
        Vocabulary, VocabularyResponse,
    },
    password::Argon2Hasher,
    repository::{
        TopicRepository, UserRepository, UserVocabularyRepository, VocabularyRepository,
    },
    token::Principal,
};

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890-abcdefgh";

// --- Clock ---

/// A clock the test can move by hand.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// --- Pagination helper shared by the mocks ---

fn paginate<T>(items: Vec<T>, page: &PageParams) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page {
        items,
        page: page.page(),
        per_page: page.per_page(),
        total,
    }
}

// --- Users ---

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn rows(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_live(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_live_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        // Simulates the database unique index on email.
        if rows.iter().any(|u| u.email == user.email) {
            return Err(AppError::from_constraint("uk_users_email"));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &UserSearchFilter,
        page: &PageParams,
    ) -> Result<Page<User>, AppError> {
        Ok(paginate(self.filtered(filter), page))
    }

    async fn export(&self, filter: &UserSearchFilter) -> Result<Vec<User>, AppError> {
        Ok(self.filtered(filter))
    }
}

impl InMemoryUserRepository {
    fn filtered(&self, filter: &UserSearchFilter) -> Vec<User> {
        let mut users: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .filter(|u| match &filter.email {
                Some(email) => u.email.to_lowercase().contains(email),
                None => true,
            })
            .filter(|u| match &filter.username {
                Some(username) => u
                    .username
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(username)),
                None => true,
            })
            .filter(|u| match &filter.display_name {
                Some(name) => u.display_name.to_lowercase().contains(name),
                None => true,
            })
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }
}

// --- Topics ---

#[derive(Default)]
pub struct InMemoryTopicRepository {
    rows: Mutex<Vec<Topic>>,
}

impl InMemoryTopicRepository {
    pub fn rows(&self) -> Vec<Topic> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn find_live(&self, id: Uuid) -> Result<Option<Topic>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned())
    }

    async fn find_live_by_slug(&self, slug: &str) -> Result<Option<Topic>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug && t.deleted_at.is_none())
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.name.to_lowercase() == name.to_lowercase()))
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().iter().any(|t| t.slug == slug))
    }

    async fn insert(&self, topic: &Topic) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|t| t.slug == topic.slug) {
            return Err(AppError::from_constraint("uk_topics_slug"));
        }
        rows.push(topic.clone());
        Ok(())
    }

    async fn update(&self, topic: &Topic) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|t| t.id == topic.id) {
            *existing = topic.clone();
        }
        Ok(())
    }

    async fn list_active(&self, page: &PageParams) -> Result<Page<Topic>, AppError> {
        let mut topics: Vec<Topic> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.deleted_at.is_none() && t.status == TopicStatus::Active)
            .cloned()
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(topics, page))
    }

    async fn search(
        &self,
        filter: &TopicSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Topic>, AppError> {
        Ok(paginate(self.filtered(filter), page))
    }

    async fn export(&self, filter: &TopicSearchFilter) -> Result<Vec<Topic>, AppError> {
        Ok(self.filtered(filter))
    }
}

impl InMemoryTopicRepository {
    fn filtered(&self, filter: &TopicSearchFilter) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .filter(|t| match &filter.name {
                Some(name) => t.name.to_lowercase().contains(name),
                None => true,
            })
            .filter(|t| match &filter.slug {
                Some(slug) => t.slug.contains(slug),
                None => true,
            })
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        topics.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        topics
    }
}

// --- Vocabularies ---

#[derive(Default)]
pub struct InMemoryVocabularyRepository {
    rows: Mutex<Vec<Vocabulary>>,
    links: Mutex<Vec<TopicVocabulary>>,
}

impl InMemoryVocabularyRepository {
    pub fn rows(&self) -> Vec<Vocabulary> {
        self.rows.lock().unwrap().clone()
    }

    pub fn links(&self) -> Vec<TopicVocabulary> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl VocabularyRepository for InMemoryVocabularyRepository {
    async fn find_live(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id && v.deleted_at.is_none())
            .cloned())
    }

    async fn find_approved(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| {
                v.id == id
                    && v.deleted_at.is_none()
                    && v.status == lexhub::models::VocabStatus::Approved
            })
            .cloned())
    }

    async fn find_live_by_term(
        &self,
        term_normalized: &str,
        language: &str,
    ) -> Result<Option<Vocabulary>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| {
                v.term_normalized == term_normalized
                    && v.language == language
                    && v.deleted_at.is_none()
            })
            .cloned())
    }

    async fn insert_contribution(
        &self,
        vocab: &Vocabulary,
        topic_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        // Simulates the (term_normalized, language) unique index.
        if rows
            .iter()
            .any(|v| v.term_normalized == vocab.term_normalized && v.language == vocab.language)
        {
            return Err(AppError::from_constraint("uk_vocab_term_language"));
        }
        rows.push(vocab.clone());
        let mut links = self.links.lock().unwrap();
        for topic_id in topic_ids {
            links.push(TopicVocabulary {
                topic_id: *topic_id,
                vocabulary_id: vocab.id,
                created_at: vocab.created_at,
            });
        }
        Ok(())
    }

    async fn update(&self, vocab: &Vocabulary) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|v| v.id == vocab.id) {
            *existing = vocab.clone();
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &VocabSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Vocabulary>, AppError> {
        let links = self.links.lock().unwrap().clone();
        let mut vocab: Vec<Vocabulary> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.deleted_at.is_none())
            .filter(|v| match filter.topic_id {
                Some(topic_id) => links
                    .iter()
                    .any(|l| l.topic_id == topic_id && l.vocabulary_id == v.id),
                None => true,
            })
            .filter(|v| filter.status.is_none_or(|s| v.status == s))
            .filter(|v| match &filter.language {
                Some(language) => &v.language == language,
                None => true,
            })
            .filter(|v| match &filter.query {
                Some(query) => v.term_normalized.contains(query),
                None => true,
            })
            .cloned()
            .collect();
        vocab.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(vocab, page))
    }
}

// --- User vocabularies ---

#[derive(Default)]
pub struct InMemoryUserVocabularyRepository {
    rows: Mutex<Vec<UserVocabulary>>,
}

impl InMemoryUserVocabularyRepository {
    pub fn rows(&self) -> Vec<UserVocabulary> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserVocabularyRepository for InMemoryUserVocabularyRepository {
    async fn find(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
    ) -> Result<Option<UserVocabulary>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.user_id == user_id && e.vocabulary_id == vocabulary_id)
            .cloned())
    }

    async fn exists(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.user_id == user_id && e.vocabulary_id == vocabulary_id))
    }

    async fn insert(&self, entry: &UserVocabulary) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|e| e.user_id == entry.user_id && e.vocabulary_id == entry.vocabulary_id)
        {
            return Err(AppError::from_constraint("uk_user_vocab_user_vocab"));
        }
        rows.push(entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &UserVocabulary) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.user_id == user_id && e.vocabulary_id == vocabulary_id));
        Ok(rows.len() < before)
    }

    async fn list(
        &self,
        user_id: Uuid,
        status: Option<LearningStatus>,
        page: &PageParams,
    ) -> Result<Page<UserVocabulary>, AppError> {
        let mut entries: Vec<UserVocabulary> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(entries, page))
    }
}

// --- Harness ---

pub struct TestContext {
    pub services: Services,
    pub tokens: TokenService,
    pub clock: Arc<FixedClock>,
    pub users: Arc<InMemoryUserRepository>,
    pub topics: Arc<InMemoryTopicRepository>,
    pub vocab: Arc<InMemoryVocabularyRepository>,
    pub user_vocab: Arc<InMemoryUserVocabularyRepository>,
    pub repos: Repositories,
}

pub fn setup() -> TestContext {
    let users = Arc::new(InMemoryUserRepository::default());
    let topics = Arc::new(InMemoryTopicRepository::default());
    let vocab = Arc::new(InMemoryVocabularyRepository::default());
    let user_vocab = Arc::new(InMemoryUserVocabularyRepository::default());
    let clock = Arc::new(FixedClock::new());

    let repos = Repositories {
        users: users.clone(),
        topics: topics.clone(),
        vocab: vocab.clone(),
        user_vocab: user_vocab.clone(),
    };
    let tokens = TokenService::new(TEST_JWT_SECRET, 3600).unwrap();
    let services = Services::new(&repos, Arc::new(Argon2Hasher), tokens.clone(), clock.clone());

    TestContext {
        services,
        tokens,
        clock,
        users,
        topics,
        vocab,
        user_vocab,
        repos,
    }
}

pub fn admin_principal() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        role: UserRole::Admin,
    }
}

pub fn user_principal() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        role: UserRole::User,
    }
}

pub async fn register(ctx: &TestContext, email: &str) -> lexhub::models::UserResponse {
    ctx.services
        .auth
        .register(RegisterRequest {
            email: email.to_string(),
            password: "correct-horse".to_string(),
            display_name: "Test User".to_string(),
        })
        .await
        .expect("registration failed")
}

pub async fn seed_topic(ctx: &TestContext, name: &str) -> lexhub::models::TopicResponse {
    ctx.services
        .topics
        .create(
            &admin_principal(),
            CreateTopicRequest {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .expect("topic creation failed")
}

/// Contributes and approves a vocabulary entry in one step.
pub async fn seed_approved_vocab(
    ctx: &TestContext,
    term: &str,
    language: &str,
    topic_ids: Vec<Uuid>,
) -> VocabularyResponse {
    let contributor = register(ctx, &format!("{term}-author@example.com")).await;
    let pending = ctx
        .services
        .vocab
        .contribute(
            contributor.id,
            CreateVocabularyRequest {
                term: term.to_string(),
                definition: format!("definition of {term}"),
                example: None,
                phonetic: None,
                part_of_speech: None,
                language: language.to_string(),
                topic_ids,
            },
        )
        .await
        .expect("contribution failed");
    ctx.services
        .vocab
        .approve(&admin_principal(), pending.id)
        .await
        .expect("approval failed")
}
