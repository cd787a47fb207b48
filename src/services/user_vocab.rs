use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    clock::{Clock, ClockState},
    error::AppError,
    models::{
        LearningStatus, Page, PageParams, UpdateUserVocabularyRequest, UserVocabulary,
        UserVocabularyResponse,
    },
    repository::{
        UserRepository, UserRepositoryState, UserVocabularyRepository,
        UserVocabularyRepositoryState, VocabularyRepository, VocabularyRepositoryState,
    },
};

/// UserVocabularyService
///
/// The personal learning list. Every operation first confirms the acting
/// user still exists (non-deleted); only APPROVED vocabulary can be added.
#[derive(Clone)]
pub struct UserVocabularyService {
    user_vocab: UserVocabularyRepositoryState,
    vocab: VocabularyRepositoryState,
    users: UserRepositoryState,
    clock: ClockState,
}

impl UserVocabularyService {
    pub fn new(
        user_vocab: UserVocabularyRepositoryState,
        vocab: VocabularyRepositoryState,
        users: UserRepositoryState,
        clock: ClockState,
    ) -> Self {
        Self {
            user_vocab,
            vocab,
            users,
            clock,
        }
    }

    async fn ensure_user_live(&self, user_id: Uuid) -> Result<(), AppError> {
        self.users
            .find_live(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(())
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<LearningStatus>,
        page: PageParams,
    ) -> Result<Page<UserVocabularyResponse>, AppError> {
        self.ensure_user_live(user_id).await?;
        let entries = self.user_vocab.list(user_id, status, &page).await?;
        Ok(entries.map(UserVocabularyResponse::from))
    }

    /// Adds an APPROVED vocabulary entry to the list, once. A pending,
    /// rejected, or deleted entry is reported as not found; an entry already
    /// on the list is a conflict.
    pub async fn add(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
    ) -> Result<UserVocabularyResponse, AppError> {
        self.ensure_user_live(user_id).await?;
        let vocabulary = self
            .vocab
            .find_approved(vocabulary_id)
            .await?
            .ok_or(AppError::VocabNotFound)?;

        if self.user_vocab.exists(user_id, vocabulary.id).await? {
            return Err(AppError::UserVocabExists);
        }

        let now = self.clock.now();
        let entry = UserVocabulary {
            id: Uuid::new_v4(),
            user_id,
            vocabulary_id: vocabulary.id,
            status: LearningStatus::New,
            progress: 0,
            last_reviewed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.user_vocab.insert(&entry).await?;
        Ok(entry.into())
    }

    /// Partial update: each field is independent, unset fields stay as they
    /// are. Progress outside [0, 100] is rejected before anything is written.
    pub async fn update(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
        request: UpdateUserVocabularyRequest,
        last_reviewed_at: Option<DateTime<Utc>>,
    ) -> Result<UserVocabularyResponse, AppError> {
        self.ensure_user_live(user_id).await?;
        let mut entry = self
            .user_vocab
            .find(user_id, vocabulary_id)
            .await?
            .ok_or(AppError::UserVocabNotFound)?;

        if let Some(status) = request.status {
            entry.status = status;
        }
        if let Some(progress) = request.progress {
            if !(0..=100).contains(&progress) {
                return Err(AppError::InvalidProgress);
            }
            entry.progress = progress;
        }
        if let Some(reviewed) = last_reviewed_at {
            entry.last_reviewed_at = Some(reviewed);
        }

        entry.updated_at = self.clock.now();
        self.user_vocab.update(&entry).await?;
        Ok(entry.into())
    }

    pub async fn remove(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<(), AppError> {
        self.ensure_user_live(user_id).await?;
        if !self.user_vocab.delete(user_id, vocabulary_id).await? {
            return Err(AppError::UserVocabNotFound);
        }
        Ok(())
    }
}
