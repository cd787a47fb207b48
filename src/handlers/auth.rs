use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::AppError,
    models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
};

/// register
///
/// [Public Route] Creates a new user account with email, password, and
/// display name. The email is normalized before the uniqueness check, so
/// `Foo@Bar.com` and `foo@bar.com` are the same address.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserResponse),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.services.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// login
///
/// [Public Route] Verifies credentials and returns a bearer token plus the
/// user's public view. Unknown email and wrong password are deliberately
/// indistinguishable in the response.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "User not active")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.services.auth.login(payload).await?))
}
