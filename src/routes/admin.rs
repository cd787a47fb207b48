use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Admin Router Module
///
/// Management surface for users, topics, and vocabulary moderation, nested
/// under `/admin`.
///
/// Access Control:
/// Authentication comes from the `AuthUser` extractor in each handler; the
/// ADMIN role requirement is enforced inside the service operations, which
/// take the caller's principal explicitly and return AccessDenied for
/// non-admin callers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // /admin/users: search, CSV export, create, update, delete, restore,
        // password reset.
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/users/export", get(handlers::export_users))
        .route(
            "/users/{user_id}",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .route(
            "/users/{user_id}/reset-password",
            post(handlers::reset_password),
        )
        .route("/users/{user_id}/restore", post(handlers::restore_user))
        // /admin/topics: search, CSV export, create, update, soft delete.
        .route(
            "/topics",
            get(handlers::search_topics).post(handlers::create_topic),
        )
        .route("/topics/export", get(handlers::export_topics))
        .route(
            "/topics/{id}",
            patch(handlers::update_topic).delete(handlers::delete_topic),
        )
        // /admin/vocab: the moderation verbs.
        .route("/vocab/{id}/approve", patch(handlers::approve_vocab))
        .route("/vocab/{id}/reject", patch(handlers::reject_vocab))
}
