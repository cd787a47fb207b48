use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::filters::TopicSearchFilter;
use crate::models::{Page, PageParams, Topic, TopicStatus};

const TOPIC_COLUMNS: &str =
    "id, name, slug, description, status, created_at, updated_at, deleted_at";

/// TopicRepository
///
/// Persistence contract for topics. Name and slug uniqueness checks are
/// global (the backing unique indexes do not exempt soft-deleted rows), so a
/// restored topic can never collide with one created in the meantime.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn find_live(&self, id: Uuid) -> Result<Option<Topic>, AppError>;
    async fn find_live_by_slug(&self, slug: &str) -> Result<Option<Topic>, AppError>;
    /// Case-insensitive name existence check across all rows.
    async fn exists_by_name(&self, name: &str) -> Result<bool, AppError>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError>;
    async fn insert(&self, topic: &Topic) -> Result<(), AppError>;
    async fn update(&self, topic: &Topic) -> Result<(), AppError>;
    /// Public browsing: ACTIVE, non-deleted topics only.
    async fn list_active(&self, page: &PageParams) -> Result<Page<Topic>, AppError>;
    async fn search(
        &self,
        filter: &TopicSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Topic>, AppError>;
    async fn export(&self, filter: &TopicSearchFilter) -> Result<Vec<Topic>, AppError>;
}

pub type TopicRepositoryState = Arc<dyn TopicRepository>;

pub struct PgTopicRepository {
    pool: PgPool,
}

impl PgTopicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_topic_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &TopicSearchFilter) {
    if let Some(name) = &filter.name {
        builder.push(" AND name ILIKE ");
        builder.push_bind(format!("%{name}%"));
    }
    if let Some(slug) = &filter.slug {
        builder.push(" AND slug ILIKE ");
        builder.push_bind(format!("%{slug}%"));
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    async fn find_live(&self, id: Uuid) -> Result<Option<Topic>, AppError> {
        let topic = sqlx::query_as::<_, Topic>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(topic)
    }

    async fn find_live_by_slug(&self, slug: &str) -> Result<Option<Topic>, AppError> {
        let topic = sqlx::query_as::<_, Topic>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE slug = $1 AND deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(topic)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM topics WHERE lower(name) = lower($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM topics WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, topic: &Topic) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO topics (id, name, slug, description, status, created_at, updated_at, \
             deleted_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(topic.id)
        .bind(&topic.name)
        .bind(&topic.slug)
        .bind(&topic.description)
        .bind(topic.status)
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .bind(topic.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, topic: &Topic) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE topics SET name = $2, slug = $3, description = $4, status = $5, \
             updated_at = $6, deleted_at = $7 WHERE id = $1",
        )
        .bind(topic.id)
        .bind(&topic.name)
        .bind(&topic.slug)
        .bind(&topic.description)
        .bind(topic.status)
        .bind(topic.updated_at)
        .bind(topic.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_active(&self, page: &PageParams) -> Result<Page<Topic>, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM topics WHERE deleted_at IS NULL AND status = $1",
        )
        .bind(TopicStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Topic>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE deleted_at IS NULL AND status = $1 \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(TopicStatus::Active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items,
            page: page.page(),
            per_page: page.per_page(),
            total,
        })
    }

    async fn search(
        &self,
        filter: &TopicSearchFilter,
        page: &PageParams,
    ) -> Result<Page<Topic>, AppError> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM topics WHERE deleted_at IS NULL");
        push_topic_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE deleted_at IS NULL"
        ));
        push_topic_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let items = builder
            .build_query_as::<Topic>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            page: page.page(),
            per_page: page.per_page(),
            total,
        })
    }

    async fn export(&self, filter: &TopicSearchFilter) -> Result<Vec<Topic>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE deleted_at IS NULL"
        ));
        push_topic_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        let topics = builder
            .build_query_as::<Topic>()
            .fetch_all(&self.pool)
            .await?;
        Ok(topics)
    }
}
