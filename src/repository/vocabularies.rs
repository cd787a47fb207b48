use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::filters::VocabSearchFilter;
use crate::models::{Page, PageParams, Vocabulary, VocabStatus};

const VOCAB_COLUMNS: &str = "v.id, v.term, v.term_normalized, v.definition, v.example, \
     v.phonetic, v.part_of_speech, v.language, v.status, v.created_by, v.created_at, \
     v.updated_at, v.deleted_at";

/// VocabularyRepository
///
/// Persistence contract for vocabulary entries and their topic links.
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    async fn find_live(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError>;
    /// Non-deleted AND approved: the only shape ordinary callers may see.
    async fn find_approved(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError>;
    async fn find_live_by_term(
        &self,
        term_normalized: &str,
        language: &str,
    ) -> Result<Option<Vocabulary>, AppError>;
    /// Inserts the vocabulary row and all of its topic links in a single
    /// transaction, so a failed link insert commits nothing.
    async fn insert_contribution(
        &self,
        vocab: &Vocabulary,
        topic_ids: &[Uuid],
    ) -> Result<(), AppError>;
    async fn update(&self, vocab: &Vocabulary) -> Result<(), AppError>;
    /// One composed query for all criteria combinations; a present
    /// `topic_id` joins the membership table in the same predicate.
    async fn search(
        &self,
        filter: &VocabSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Vocabulary>, AppError>;
}

pub type VocabularyRepositoryState = Arc<dyn VocabularyRepository>;

pub struct PgVocabularyRepository {
    pool: PgPool,
}

impl PgVocabularyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the shared filter predicate. The base query must already contain
/// `WHERE v.deleted_at IS NULL` and, when `topic_id` is present, the join on
/// `topic_vocabularies tv`.
fn push_vocab_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &VocabSearchFilter) {
    if let Some(topic_id) = filter.topic_id {
        builder.push(" AND tv.topic_id = ");
        builder.push_bind(topic_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND v.status = ");
        builder.push_bind(status);
    }
    if let Some(language) = &filter.language {
        builder.push(" AND v.language = ");
        builder.push_bind(language.clone());
    }
    if let Some(query) = &filter.query {
        builder.push(" AND v.term_normalized LIKE ");
        builder.push_bind(format!("%{query}%"));
    }
}

fn base_query(select: &str, filter: &VocabSearchFilter) -> String {
    // The topic scope is part of the composed query, never a post-filter.
    if filter.topic_id.is_some() {
        format!(
            "{select} FROM vocabularies v \
             JOIN topic_vocabularies tv ON tv.vocabulary_id = v.id \
             WHERE v.deleted_at IS NULL"
        )
    } else {
        format!("{select} FROM vocabularies v WHERE v.deleted_at IS NULL")
    }
}

#[async_trait]
impl VocabularyRepository for PgVocabularyRepository {
    async fn find_live(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError> {
        let vocab = sqlx::query_as::<_, Vocabulary>(&format!(
            "SELECT {VOCAB_COLUMNS} FROM vocabularies v \
             WHERE v.id = $1 AND v.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vocab)
    }

    async fn find_approved(&self, id: Uuid) -> Result<Option<Vocabulary>, AppError> {
        let vocab = sqlx::query_as::<_, Vocabulary>(&format!(
            "SELECT {VOCAB_COLUMNS} FROM vocabularies v \
             WHERE v.id = $1 AND v.status = $2 AND v.deleted_at IS NULL"
        ))
        .bind(id)
        .bind(VocabStatus::Approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vocab)
    }

    async fn find_live_by_term(
        &self,
        term_normalized: &str,
        language: &str,
    ) -> Result<Option<Vocabulary>, AppError> {
        let vocab = sqlx::query_as::<_, Vocabulary>(&format!(
            "SELECT {VOCAB_COLUMNS} FROM vocabularies v \
             WHERE v.term_normalized = $1 AND v.language = $2 AND v.deleted_at IS NULL"
        ))
        .bind(term_normalized)
        .bind(language)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vocab)
    }

    async fn insert_contribution(
        &self,
        vocab: &Vocabulary,
        topic_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO vocabularies (id, term, term_normalized, definition, example, phonetic, \
             part_of_speech, language, status, created_by, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(vocab.id)
        .bind(&vocab.term)
        .bind(&vocab.term_normalized)
        .bind(&vocab.definition)
        .bind(&vocab.example)
        .bind(&vocab.phonetic)
        .bind(&vocab.part_of_speech)
        .bind(&vocab.language)
        .bind(vocab.status)
        .bind(vocab.created_by)
        .bind(vocab.created_at)
        .bind(vocab.updated_at)
        .bind(vocab.deleted_at)
        .execute(&mut *tx)
        .await?;

        for topic_id in topic_ids {
            sqlx::query(
                "INSERT INTO topic_vocabularies (topic_id, vocabulary_id, created_at) \
                 VALUES ($1, $2, $3)",
            )
            .bind(topic_id)
            .bind(vocab.id)
            .bind(vocab.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, vocab: &Vocabulary) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vocabularies SET term = $2, term_normalized = $3, definition = $4, \
             example = $5, phonetic = $6, part_of_speech = $7, language = $8, status = $9, \
             updated_at = $10, deleted_at = $11 WHERE id = $1",
        )
        .bind(vocab.id)
        .bind(&vocab.term)
        .bind(&vocab.term_normalized)
        .bind(&vocab.definition)
        .bind(&vocab.example)
        .bind(&vocab.phonetic)
        .bind(&vocab.part_of_speech)
        .bind(&vocab.language)
        .bind(vocab.status)
        .bind(vocab.updated_at)
        .bind(vocab.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn search(
        &self,
        filter: &VocabSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Vocabulary>, AppError> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new(base_query("SELECT COUNT(*)", filter));
        push_vocab_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(base_query(&format!("SELECT {VOCAB_COLUMNS}"), filter));
        push_vocab_filters(&mut builder, filter);
        builder.push(" ORDER BY v.created_at DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let items = builder
            .build_query_as::<Vocabulary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            page: page.page(),
            per_page: page.per_page(),
            total,
        })
    }
}
