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
    filters::UserSearchFilter,
    models::{
        AdminResetPasswordRequest, AdminUpdateUserRequest, Page, PageParams, RegisterRequest,
        UserResponse, UserRole, UserStatus,
    },
};

/// Admin user search parameters; string criteria match by case-insensitive
/// substring, role and status exactly.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl From<UserListQuery> for UserSearchFilter {
    fn from(query: UserListQuery) -> Self {
        UserSearchFilter {
            email: query.email,
            username: query.username,
            display_name: query.display_name,
            role: query.role,
            status: query.status,
        }
    }
}

fn users_csv(users: &[UserResponse]) -> String {
    // UTF-8 BOM for Excel compatibility.
    let mut csv = String::from("\u{feff}");
    csv.push_str("id,email,username,displayName,role,status,createdAt\n");
    for user in users {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            user.id,
            csv_escape(&user.email),
            csv_escape(user.username.as_deref().unwrap_or("")),
            csv_escape(&user.display_name),
            user.role.as_str(),
            user.status.as_str(),
            user.created_at.to_rfc3339(),
        ));
    }
    csv
}

/// list_users
///
/// [Admin Route] Pages through non-deleted users with search filters.
#[utoipa::path(
    get,
    path = "/admin/users",
    params(UserListQuery, PageParams),
    responses(
        (status = 200, description = "Users page"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    Ok(Json(
        state
            .services
            .users
            .list(&auth.principal(), query.into(), page)
            .await?,
    ))
}

/// export_users
///
/// [Admin Route] CSV export with the same filters as the search endpoint.
#[utoipa::path(
    get,
    path = "/admin/users/export",
    params(UserListQuery),
    responses(
        (status = 200, description = "CSV attachment"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn export_users(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Response, AppError> {
    let users = state
        .services
        .users
        .export(&auth.principal(), query.into())
        .await?;
    let csv = users_csv(&users);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"users.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// create_user
///
/// [Admin Route] Creates a new account through the same registration flow as
/// the public endpoint; the new account starts as an ACTIVE standard user.
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created", body = UserResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    auth.principal().require_admin()?;
    let user = state.services.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// update_user
///
/// [Admin Route] Partial update of any non-deleted user, including email,
/// role, and status moves.
#[utoipa::path(
    patch,
    path = "/admin/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(
        state
            .services
            .users
            .admin_update(&auth.principal(), user_id, payload)
            .await?,
    ))
}

/// delete_user
///
/// [Admin Route] Soft-deletes a user; the account becomes invisible to every
/// ordinary lookup but can be restored.
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .users
        .delete(&auth.principal(), user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// reset_password
///
/// [Admin Route] Replaces a user's password digest.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/reset-password",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = AdminResetPasswordRequest,
    responses(
        (status = 204, description = "Password reset"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn reset_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AdminResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .users
        .reset_password(&auth.principal(), user_id, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// restore_user
///
/// [Admin Route] Clears the soft-delete marker and reactivates the account.
/// Restoring a user that was never deleted is a no-op.
#[utoipa::path(
    post,
    path = "/admin/users/{user_id}/restore",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Restored", body = UserResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn restore_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(
        state
            .services
            .users
            .restore(&auth.principal(), user_id)
            .await?,
    ))
}
