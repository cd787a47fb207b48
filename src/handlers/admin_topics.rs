use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use super::csv_escape;
use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    filters::TopicSearchFilter,
    models::{
        CreateTopicRequest, Page, PageParams, TopicResponse, TopicStatus, UpdateTopicRequest,
    },
};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopicListQuery {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub status: Option<TopicStatus>,
}

impl From<TopicListQuery> for TopicSearchFilter {
    fn from(query: TopicListQuery) -> Self {
        TopicSearchFilter {
            name: query.name,
            slug: query.slug,
            status: query.status,
        }
    }
}

fn topics_csv(topics: &[TopicResponse]) -> String {
    // UTF-8 BOM for Excel compatibility.
    let mut csv = String::from("\u{feff}");
    csv.push_str("id,name,slug,description,createdAt\n");
    for topic in topics {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            topic.id,
            csv_escape(&topic.name),
            csv_escape(&topic.slug),
            csv_escape(topic.description.as_deref().unwrap_or("")),
            topic.created_at.to_rfc3339(),
        ));
    }
    csv
}

/// search_topics
///
/// [Admin Route] Pages through non-deleted topics regardless of status, with
/// name/slug/status filters.
#[utoipa::path(
    get,
    path = "/admin/topics",
    params(TopicListQuery, PageParams),
    responses(
        (status = 200, description = "Topics page"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn search_topics(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TopicListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<TopicResponse>>, AppError> {
    Ok(Json(
        state
            .services
            .topics
            .search(&auth.principal(), query.into(), page)
            .await?,
    ))
}

/// export_topics
///
/// [Admin Route] CSV export with the same filters as the search endpoint.
#[utoipa::path(
    get,
    path = "/admin/topics/export",
    params(TopicListQuery),
    responses(
        (status = 200, description = "CSV attachment"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn export_topics(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TopicListQuery>,
) -> Result<Response, AppError> {
    let topics = state
        .services
        .topics
        .export(&auth.principal(), query.into())
        .await?;
    let csv = topics_csv(&topics);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"topics.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// create_topic
///
/// [Admin Route] Creates an ACTIVE topic; the slug is derived from the name
/// with collision suffixes, never supplied by the caller.
#[utoipa::path(
    post,
    path = "/admin/topics",
    request_body = CreateTopicRequest,
    responses(
        (status = 201, description = "Created", body = TopicResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<TopicResponse>), AppError> {
    let topic = state
        .services
        .topics
        .create(&auth.principal(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

/// update_topic
///
/// [Admin Route] Partial topic update. Renaming regenerates the slug; if the
/// new name resolves to the topic's current slug, the slug stays unchanged.
#[utoipa::path(
    patch,
    path = "/admin/topics/{id}",
    params(("id" = Uuid, Path, description = "Topic ID")),
    request_body = UpdateTopicRequest,
    responses(
        (status = 200, description = "Updated", body = TopicResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTopicRequest>,
) -> Result<Json<TopicResponse>, AppError> {
    Ok(Json(
        state
            .services
            .topics
            .update(&auth.principal(), id, payload)
            .await?,
    ))
}

/// delete_topic
///
/// [Admin Route] Soft-deletes a topic; existing vocabulary links remain but
/// the topic disappears from browsing and cannot take new links.
#[utoipa::path(
    delete,
    path = "/admin/topics/{id}",
    params(("id" = Uuid, Path, description = "Topic ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.topics.delete(&auth.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
