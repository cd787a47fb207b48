use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    filters::VocabSearchFilter,
    models::{Page, PageParams, TopicResponse, VocabularyResponse},
};

/// Query parameters for vocabulary listing under a topic.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopicVocabQuery {
    /// Substring match against the normalized term.
    pub query: Option<String>,
    /// Exact language code match.
    pub language: Option<String>,
}

/// list_topics
///
/// [Public Route] Pages through ACTIVE topics. Inactive and soft-deleted
/// topics are invisible here.
#[utoipa::path(
    get,
    path = "/topics",
    params(PageParams),
    responses((status = 200, description = "Active topics page"))
)]
pub async fn list_topics(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<TopicResponse>>, AppError> {
    Ok(Json(state.services.topics.list_active(page).await?))
}

/// get_topic
///
/// [Public Route] A single ACTIVE topic by id; anything else is a 404.
#[utoipa::path(
    get,
    path = "/topics/{id}",
    params(("id" = Uuid, Path, description = "Topic ID")),
    responses(
        (status = 200, description = "Found", body = TopicResponse),
        (status = 404, description = "Not found or inactive")
    )
)]
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TopicResponse>, AppError> {
    Ok(Json(state.services.topics.get_active(id).await?))
}

/// list_topic_vocab
///
/// [Public Route] Approved vocabulary entries linked to a topic, with
/// optional term/language filters combined into the same query.
#[utoipa::path(
    get,
    path = "/topics/{id}/vocab",
    params(("id" = Uuid, Path, description = "Topic ID"), TopicVocabQuery, PageParams),
    responses((status = 200, description = "Approved vocabulary page"))
)]
pub async fn list_topic_vocab(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TopicVocabQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<VocabularyResponse>>, AppError> {
    let filter = VocabSearchFilter {
        query: query.query,
        topic_id: Some(id),
        language: query.language,
        status: None,
    };
    Ok(Json(
        state.services.vocab.search_approved(filter, page).await?,
    ))
}
