use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enumerations (wire form is SCREAMING_SNAKE_CASE, matching the DB enums) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "topic_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TopicStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "vocab_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum VocabStatus {
    Pending,
    Approved,
    Rejected,
}

/// Learning-list progression states. The label set comes from the product
/// configuration; no scheduling semantics are attached to them here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, TS, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "learning_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum LearningStatus {
    New,
    Learning,
    Mastered,
}

// --- Entities (database rows; internal only, never serialized directly) ---

/// User
///
/// Canonical identity record from the `users` table. `deleted_at` is the
/// soft-delete marker: a row with it set is treated as non-existent by every
/// ordinary lookup path. The password digest never leaves this struct; the
/// outward view is [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub locale: Option<String>,
    pub time_zone: Option<String>,
    pub daily_goal: Option<i32>,
    pub preferences: Option<serde_json::Value>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Topic
///
/// A vocabulary grouping. `slug` is derived from `name` and unique across
/// all topics.
#[derive(Debug, Clone, FromRow)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: TopicStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Vocabulary
///
/// A vocabulary entry. `(term_normalized, language)` is unique among
/// non-deleted rows; entries start PENDING and become visible to ordinary
/// users only once APPROVED.
#[derive(Debug, Clone, FromRow)]
pub struct Vocabulary {
    pub id: Uuid,
    pub term: String,
    pub term_normalized: String,
    pub definition: String,
    pub example: Option<String>,
    pub phonetic: Option<String>,
    pub part_of_speech: Option<String>,
    pub language: String,
    pub status: VocabStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// UserVocabulary
///
/// Membership of a vocabulary entry in one user's learning list, unique per
/// (user_id, vocabulary_id). Removed outright, never soft-deleted.
#[derive(Debug, Clone, FromRow)]
pub struct UserVocabulary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vocabulary_id: Uuid,
    pub status: LearningStatus,
    pub progress: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// TopicVocabulary
///
/// Topic membership link, unique per (topic_id, vocabulary_id). Only created
/// while the topic is ACTIVE.
#[derive(Debug, Clone, FromRow)]
pub struct TopicVocabulary {
    pub topic_id: Uuid,
    pub vocabulary_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- Pagination ---

/// One page of results plus the total row count for the filtered set.
/// Ordering is whatever the repository query specifies; this container adds
/// none of its own.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Page selection query parameters, shared by every listing endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
pub struct PageParams {
    /// Zero-based page index. Defaults to 0.
    pub page: Option<u32>,
    /// Page size, capped at 100. Defaults to 20.
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).min(100)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page()) * self.limit()
    }
}

// --- Request payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial self-service profile update; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateMeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i32>,
}

/// Admin-side partial user update. A superset of [`UpdateMeRequest`] that can
/// also move email, role, and status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminUpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminResetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTopicRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateTopicRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
}

/// A new vocabulary contribution. `topic_ids` may carry duplicates; they are
/// de-duplicated before linkage.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateVocabularyRequest {
    pub term: String,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    pub language: String,
    #[serde(default)]
    pub topic_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AddUserVocabularyRequest {
    pub vocabulary_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateUserVocabularyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LearningStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
}

// --- Response views ---

/// UserResponse
///
/// The public view of a user account. Notably excludes the password digest
/// and the soft-delete marker.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub locale: Option<String>,
    pub time_zone: Option<String>,
    pub daily_goal: Option<i32>,
    #[ts(type = "Record<string, unknown> | null")]
    #[schema(value_type = Object)]
    pub preferences: Option<serde_json::Value>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            role: user.role,
            status: user.status,
            locale: user.locale,
            time_zone: user.time_zone,
            daily_goal: user.daily_goal,
            preferences: user.preferences,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// LoginResponse
///
/// Successful authentication result: the bearer token, its lifetime, and the
/// authenticated user's public view.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TopicResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name,
            slug: topic.slug,
            description: topic.description,
            created_at: topic.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct VocabularyResponse {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    pub example: Option<String>,
    pub phonetic: Option<String>,
    pub part_of_speech: Option<String>,
    pub language: String,
    pub status: VocabStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Vocabulary> for VocabularyResponse {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            id: vocab.id,
            term: vocab.term,
            definition: vocab.definition,
            example: vocab.example,
            phonetic: vocab.phonetic,
            part_of_speech: vocab.part_of_speech,
            language: vocab.language,
            status: vocab.status,
            created_by: vocab.created_by,
            created_at: vocab.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserVocabularyResponse {
    pub vocabulary_id: Uuid,
    pub status: LearningStatus,
    pub progress: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserVocabulary> for UserVocabularyResponse {
    fn from(uv: UserVocabulary) -> Self {
        Self {
            vocabulary_id: uv.vocabulary_id,
            status: uv.status,
            progress: uv.progress,
            last_reviewed_at: uv.last_reviewed_at,
            created_at: uv.created_at,
            updated_at: uv.updated_at,
        }
    }
}
