use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{LearningStatus, Page, PageParams, UserVocabulary};

const USER_VOCAB_COLUMNS: &str = "id, user_id, vocabulary_id, status, progress, \
     last_reviewed_at, created_at, updated_at";

/// UserVocabularyRepository
///
/// Persistence contract for learning-list membership rows. These are plain
/// relationship rows: created and deleted outright, no soft-delete marker.
#[async_trait]
pub trait UserVocabularyRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
    ) -> Result<Option<UserVocabulary>, AppError>;
    async fn exists(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError>;
    async fn insert(&self, entry: &UserVocabulary) -> Result<(), AppError>;
    async fn update(&self, entry: &UserVocabulary) -> Result<(), AppError>;
    /// Returns whether a row was actually removed.
    async fn delete(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError>;
    async fn list(
        &self,
        user_id: Uuid,
        status: Option<LearningStatus>,
        page: &PageParams,
    ) -> Result<Page<UserVocabulary>, AppError>;
}

pub type UserVocabularyRepositoryState = Arc<dyn UserVocabularyRepository>;

pub struct PgUserVocabularyRepository {
    pool: PgPool,
}

impl PgUserVocabularyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserVocabularyRepository for PgUserVocabularyRepository {
    async fn find(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
    ) -> Result<Option<UserVocabulary>, AppError> {
        let entry = sqlx::query_as::<_, UserVocabulary>(&format!(
            "SELECT {USER_VOCAB_COLUMNS} FROM user_vocabularies \
             WHERE user_id = $1 AND vocabulary_id = $2"
        ))
        .bind(user_id)
        .bind(vocabulary_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn exists(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_vocabularies \
             WHERE user_id = $1 AND vocabulary_id = $2)",
        )
        .bind(user_id)
        .bind(vocabulary_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, entry: &UserVocabulary) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_vocabularies (id, user_id, vocabulary_id, status, progress, \
             last_reviewed_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.vocabulary_id)
        .bind(entry.status)
        .bind(entry.progress)
        .bind(entry.last_reviewed_at)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, entry: &UserVocabulary) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE user_vocabularies SET status = $2, progress = $3, last_reviewed_at = $4, \
             updated_at = $5 WHERE id = $1",
        )
        .bind(entry.id)
        .bind(entry.status)
        .bind(entry.progress)
        .bind(entry.last_reviewed_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM user_vocabularies WHERE user_id = $1 AND vocabulary_id = $2",
        )
        .bind(user_id)
        .bind(vocabulary_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        user_id: Uuid,
        status: Option<LearningStatus>,
        page: &PageParams,
    ) -> Result<Page<UserVocabulary>, AppError> {
        let (total, items) = match status {
            Some(status) => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM user_vocabularies WHERE user_id = $1 AND status = $2",
                )
                .bind(user_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
                let items = sqlx::query_as::<_, UserVocabulary>(&format!(
                    "SELECT {USER_VOCAB_COLUMNS} FROM user_vocabularies \
                     WHERE user_id = $1 AND status = $2 \
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4"
                ))
                .bind(user_id)
                .bind(status)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
            None => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM user_vocabularies WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
                let items = sqlx::query_as::<_, UserVocabulary>(&format!(
                    "SELECT {USER_VOCAB_COLUMNS} FROM user_vocabularies WHERE user_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(user_id)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                (total, items)
            }
        };

        Ok(Page {
            items,
            page: page.page(),
            per_page: page.per_page(),
            total,
        })
    }
}
