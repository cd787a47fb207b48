use uuid::Uuid;

use crate::{
    clock::{Clock, ClockState},
    error::AppError,
    filters::TopicSearchFilter,
    models::{
        CreateTopicRequest, Page, PageParams, Topic, TopicResponse, TopicStatus,
        UpdateTopicRequest,
    },
    repository::{TopicRepository, TopicRepositoryState},
    slug,
    token::Principal,
};

/// TopicService
///
/// Topic browsing for everyone, management for admins. Slugs are always
/// derived from the name through `unique_slug`; they are never accepted from
/// the outside.
#[derive(Clone)]
pub struct TopicService {
    topics: TopicRepositoryState,
    clock: ClockState,
}

impl TopicService {
    pub fn new(topics: TopicRepositoryState, clock: ClockState) -> Self {
        Self { topics, clock }
    }

    pub async fn list_active(&self, page: PageParams) -> Result<Page<TopicResponse>, AppError> {
        let topics = self.topics.list_active(&page).await?;
        Ok(topics.map(TopicResponse::from))
    }

    /// Non-admin visibility: only ACTIVE, non-deleted topics exist. An
    /// INACTIVE topic is reported as not found, not as forbidden.
    pub async fn get_active(&self, id: Uuid) -> Result<TopicResponse, AppError> {
        let topic = self
            .topics
            .find_live(id)
            .await?
            .ok_or(AppError::TopicNotFound)?;
        if topic.status != TopicStatus::Active {
            return Err(AppError::TopicNotFound);
        }
        Ok(topic.into())
    }

    pub async fn search(
        &self,
        caller: &Principal,
        filter: TopicSearchFilter,
        page: PageParams,
    ) -> Result<Page<TopicResponse>, AppError> {
        caller.require_admin()?;
        let topics = self.topics.search(&filter.normalized(), &page).await?;
        Ok(topics.map(TopicResponse::from))
    }

    pub async fn export(
        &self,
        caller: &Principal,
        filter: TopicSearchFilter,
    ) -> Result<Vec<TopicResponse>, AppError> {
        caller.require_admin()?;
        let topics = self.topics.export(&filter.normalized()).await?;
        Ok(topics.into_iter().map(TopicResponse::from).collect())
    }

    pub async fn create(
        &self,
        caller: &Principal,
        request: CreateTopicRequest,
    ) -> Result<TopicResponse, AppError> {
        caller.require_admin()?;
        let name = request.name.trim().to_string();
        if self.topics.exists_by_name(&name).await? {
            return Err(AppError::TopicNameExists);
        }
        let slug = self.unique_slug(&name, None).await?;
        let now = self.clock.now();
        let topic = Topic {
            id: Uuid::new_v4(),
            name,
            slug,
            description: request.description.map(|d| d.trim().to_string()),
            status: TopicStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.topics.insert(&topic).await?;
        Ok(topic.into())
    }

    pub async fn update(
        &self,
        caller: &Principal,
        id: Uuid,
        request: UpdateTopicRequest,
    ) -> Result<TopicResponse, AppError> {
        caller.require_admin()?;
        let mut topic = self
            .topics
            .find_live(id)
            .await?
            .ok_or(AppError::TopicNotFound)?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if !name.eq_ignore_ascii_case(&topic.name) && self.topics.exists_by_name(&name).await? {
                return Err(AppError::TopicNameExists);
            }
            topic.slug = self.unique_slug(&name, Some(topic.id)).await?;
            topic.name = name;
        }
        if let Some(description) = request.description {
            topic.description = Some(description.trim().to_string());
        }
        if let Some(status) = request.status {
            topic.status = status;
        }

        topic.updated_at = self.clock.now();
        self.topics.update(&topic).await?;
        Ok(topic.into())
    }

    pub async fn delete(&self, caller: &Principal, id: Uuid) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut topic = self
            .topics
            .find_live(id)
            .await?
            .ok_or(AppError::TopicNotFound)?;
        let now = self.clock.now();
        topic.deleted_at = Some(now);
        topic.updated_at = now;
        self.topics.update(&topic).await?;
        Ok(())
    }

    /// Resolves a unique slug for `name`. On collision the suffix ascends
    /// strictly (`-1`, `-2`, …) until a free slug is found — unless the
    /// occupied slug belongs to the entity being renamed (`current_id`), in
    /// which case the existing slug is returned unchanged to avoid churn.
    async fn unique_slug(
        &self,
        name: &str,
        current_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        let base = slug::slugify(name)?;
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.topics.exists_by_slug(&candidate).await? {
            if let Some(current) = current_id {
                if let Some(existing) = self.topics.find_live_by_slug(&candidate).await? {
                    if existing.id == current {
                        return Ok(candidate);
                    }
                }
            }
            candidate = slug::with_suffix(&base, suffix);
            suffix += 1;
        }
        Ok(candidate)
    }
}
