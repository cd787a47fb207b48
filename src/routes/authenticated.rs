use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Authenticated Router Module
///
/// Routes for any user holding a valid session token: profile self-service,
/// the personal learning list, and vocabulary contributions.
///
/// Access Control Strategy:
/// Every handler here takes the `AuthUser` extractor, which validates the
/// bearer token and re-checks that the subject still exists (non-deleted) in
/// storage. The router-level middleware rejects unauthenticated requests
/// before any handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me, PATCH /me
        // The authenticated user's profile; the PATCH is partial.
        .route("/me", get(handlers::get_me).patch(handlers::update_me))
        // GET /me/vocab, POST /me/vocab
        // The personal learning list: paged listing and adding approved
        // vocabulary entries.
        .route(
            "/me/vocab",
            get(handlers::list_my_vocab).post(handlers::add_my_vocab),
        )
        // PATCH/DELETE /me/vocab/{vocabulary_id}
        // Progress updates and outright removal of one list entry.
        .route(
            "/me/vocab/{vocabulary_id}",
            patch(handlers::update_my_vocab).delete(handlers::remove_my_vocab),
        )
        // POST /vocab/contributions
        // Submits a new vocabulary entry for moderation (stored PENDING).
        .route("/vocab/contributions", post(handlers::contribute_vocab))
}
