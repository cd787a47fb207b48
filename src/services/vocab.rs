use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    clock::{Clock, ClockState},
    error::AppError,
    filters::{VocabSearchFilter, normalize_language, normalize_term},
    models::{
        CreateVocabularyRequest, Page, PageParams, TopicStatus, VocabStatus, Vocabulary,
        VocabularyResponse,
    },
    repository::{
        TopicRepository, TopicRepositoryState, VocabularyRepository, VocabularyRepositoryState,
    },
    token::Principal,
};

/// VocabularyService
///
/// Public vocabulary search plus the moderation flow: contributions enter as
/// PENDING and only admin approval makes them visible.
#[derive(Clone)]
pub struct VocabularyService {
    vocab: VocabularyRepositoryState,
    topics: TopicRepositoryState,
    clock: ClockState,
}

impl VocabularyService {
    pub fn new(
        vocab: VocabularyRepositoryState,
        topics: TopicRepositoryState,
        clock: ClockState,
    ) -> Self {
        Self {
            vocab,
            topics,
            clock,
        }
    }

    /// Search over the publicly visible set. The APPROVED status is forced
    /// server-side; callers cannot widen it.
    pub async fn search_approved(
        &self,
        filter: VocabSearchFilter,
        page: PageParams,
    ) -> Result<Page<VocabularyResponse>, AppError> {
        let mut filter = filter.normalized();
        filter.status = Some(VocabStatus::Approved);
        let vocab = self.vocab.search(&filter, &page).await?;
        Ok(vocab.map(VocabularyResponse::from))
    }

    pub async fn get_approved(&self, id: Uuid) -> Result<VocabularyResponse, AppError> {
        let vocab = self
            .vocab
            .find_approved(id)
            .await?
            .ok_or(AppError::VocabNotFound)?;
        Ok(vocab.into())
    }

    /// Submits a new contribution. The duplicate check, the row insert, and
    /// the topic links are all-or-nothing: any invalid or inactive topic in
    /// the (de-duplicated) link set fails the whole operation before anything
    /// is written, and the insert itself is transactional.
    pub async fn contribute(
        &self,
        user_id: Uuid,
        request: CreateVocabularyRequest,
    ) -> Result<VocabularyResponse, AppError> {
        let term_normalized = normalize_term(&request.term).ok_or(AppError::InvalidTerm)?;
        let language = normalize_language(&request.language).ok_or(AppError::InvalidLanguage)?;
        let definition = request.definition.trim().to_string();
        if definition.is_empty() {
            return Err(AppError::InvalidDefinition);
        }

        // Fast-path duplicate check; the (term_normalized, language) unique
        // index is the backstop for a concurrent duplicate contribution.
        if self
            .vocab
            .find_live_by_term(&term_normalized, &language)
            .await?
            .is_some()
        {
            return Err(AppError::VocabExists);
        }

        let mut seen = HashSet::new();
        let topic_ids: Vec<Uuid> = request
            .topic_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        for topic_id in &topic_ids {
            let topic = self
                .topics
                .find_live(*topic_id)
                .await?
                .ok_or(AppError::TopicNotFound)?;
            if topic.status != TopicStatus::Active {
                return Err(AppError::TopicInactive);
            }
        }

        let now = self.clock.now();
        let vocabulary = Vocabulary {
            id: Uuid::new_v4(),
            term: request.term.trim().to_string(),
            term_normalized,
            definition,
            example: request.example.map(|e| e.trim().to_string()),
            phonetic: request.phonetic.map(|p| p.trim().to_string()),
            part_of_speech: request.part_of_speech.map(|p| p.trim().to_string()),
            language,
            status: VocabStatus::Pending,
            created_by: Some(user_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.vocab
            .insert_contribution(&vocabulary, &topic_ids)
            .await?;
        Ok(vocabulary.into())
    }

    /// Idempotent overwrite: approving an already-approved entry simply
    /// re-asserts the state.
    pub async fn approve(
        &self,
        caller: &Principal,
        id: Uuid,
    ) -> Result<VocabularyResponse, AppError> {
        self.set_status(caller, id, VocabStatus::Approved).await
    }

    pub async fn reject(
        &self,
        caller: &Principal,
        id: Uuid,
    ) -> Result<VocabularyResponse, AppError> {
        self.set_status(caller, id, VocabStatus::Rejected).await
    }

    async fn set_status(
        &self,
        caller: &Principal,
        id: Uuid,
        status: VocabStatus,
    ) -> Result<VocabularyResponse, AppError> {
        caller.require_admin()?;
        let mut vocab = self
            .vocab
            .find_live(id)
            .await?
            .ok_or(AppError::VocabNotFound)?;
        vocab.status = status;
        vocab.updated_at = self.clock.now();
        self.vocab.update(&vocab).await?;
        Ok(vocab.into())
    }
}
