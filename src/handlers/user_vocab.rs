use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    clock::Clock,
    error::AppError,
    models::{
        AddUserVocabularyRequest, LearningStatus, Page, PageParams, UpdateUserVocabularyRequest,
        UserVocabularyResponse,
    },
};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct MyVocabQuery {
    /// Restrict the listing to one learning status.
    pub status: Option<LearningStatus>,
}

/// list_my_vocab
///
/// [Authenticated Route] Pages through the user's learning list, optionally
/// filtered by learning status.
#[utoipa::path(
    get,
    path = "/me/vocab",
    params(MyVocabQuery, PageParams),
    responses((status = 200, description = "Learning list page"))
)]
pub async fn list_my_vocab(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MyVocabQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<UserVocabularyResponse>>, AppError> {
    Ok(Json(
        state
            .services
            .user_vocab
            .list(id, query.status, page)
            .await?,
    ))
}

/// add_my_vocab
///
/// [Authenticated Route] Adds an approved vocabulary entry to the learning
/// list. Adding the same entry twice is a 409.
#[utoipa::path(
    post,
    path = "/me/vocab",
    request_body = AddUserVocabularyRequest,
    responses(
        (status = 201, description = "Added", body = UserVocabularyResponse),
        (status = 404, description = "Vocabulary not found or not approved"),
        (status = 409, description = "Already on the list")
    )
)]
pub async fn add_my_vocab(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AddUserVocabularyRequest>,
) -> Result<(StatusCode, Json<UserVocabularyResponse>), AppError> {
    let entry = state
        .services
        .user_vocab
        .add(id, payload.vocabulary_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// update_my_vocab
///
/// [Authenticated Route] Updates learning status and/or progress for one
/// list entry; the review timestamp is stamped with the current time.
#[utoipa::path(
    patch,
    path = "/me/vocab/{vocabulary_id}",
    params(("vocabulary_id" = Uuid, Path, description = "Vocabulary ID")),
    request_body = UpdateUserVocabularyRequest,
    responses(
        (status = 200, description = "Updated", body = UserVocabularyResponse),
        (status = 400, description = "Progress out of range"),
        (status = 404, description = "Not on the list")
    )
)]
pub async fn update_my_vocab(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(vocabulary_id): Path<Uuid>,
    Json(payload): Json<UpdateUserVocabularyRequest>,
) -> Result<Json<UserVocabularyResponse>, AppError> {
    let now = state.clock.now();
    Ok(Json(
        state
            .services
            .user_vocab
            .update(id, vocabulary_id, payload, Some(now))
            .await?,
    ))
}

/// remove_my_vocab
///
/// [Authenticated Route] Removes an entry from the learning list outright.
#[utoipa::path(
    delete,
    path = "/me/vocab/{vocabulary_id}",
    params(("vocabulary_id" = Uuid, Path, description = "Vocabulary ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Not on the list")
    )
)]
pub async fn remove_my_vocab(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(vocabulary_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services.user_vocab.remove(id, vocabulary_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
