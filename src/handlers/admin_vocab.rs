use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::AppError, models::VocabularyResponse};

/// approve_vocab
///
/// [Admin Route] Forces a vocabulary entry to APPROVED. Idempotent: approving
/// an already-approved entry re-asserts the state.
#[utoipa::path(
    patch,
    path = "/admin/vocab/{id}/approve",
    params(("id" = Uuid, Path, description = "Vocabulary ID")),
    responses(
        (status = 200, description = "Approved", body = VocabularyResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn approve_vocab(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VocabularyResponse>, AppError> {
    Ok(Json(
        state.services.vocab.approve(&auth.principal(), id).await?,
    ))
}

/// reject_vocab
///
/// [Admin Route] Forces a vocabulary entry to REJECTED, idempotently.
#[utoipa::path(
    patch,
    path = "/admin/vocab/{id}/reject",
    params(("id" = Uuid, Path, description = "Vocabulary ID")),
    responses(
        (status = 200, description = "Rejected", body = VocabularyResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn reject_vocab(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VocabularyResponse>, AppError> {
    Ok(Json(
        state.services.vocab.reject(&auth.principal(), id).await?,
    ))
}
