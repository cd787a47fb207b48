use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    models::{UpdateMeRequest, UserResponse},
};

/// get_me
///
/// [Authenticated Route] The authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = UserResponse))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.services.users.get_me(id).await?))
}

/// update_me
///
/// [Authenticated Route] Partial self-service profile update; only the
/// provided fields change.
#[utoipa::path(
    patch,
    path = "/me",
    request_body = UpdateMeRequest,
    responses((status = 200, description = "Updated", body = UserResponse))
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.services.users.update_me(id, payload).await?))
}
