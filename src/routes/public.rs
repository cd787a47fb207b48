use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints accessible without authentication: the identity gateway and
/// read-only access to the approved, active content set.
///
/// Security Mandate:
/// Every data retrieval handler here must only ever surface ACTIVE topics
/// and APPROVED vocabulary; the status filters are enforced at the service
/// and repository layers, not left to the client.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness check for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register, POST /auth/login
        // The identity flow: account creation and token issuance.
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        // GET /topics, /topics/{id}
        // Browsing of ACTIVE topics only.
        .route("/topics", get(handlers::list_topics))
        .route("/topics/{id}", get(handlers::get_topic))
        // GET /topics/{id}/vocab
        // Approved vocabulary within one topic, with term/language filters.
        .route("/topics/{id}/vocab", get(handlers::list_topic_vocab))
        // GET /vocab?query=...&topic_id=...&language=...
        // Approved vocabulary search; all filters AND-combined in one query.
        .route("/vocab", get(handlers::search_vocab))
        // GET /vocab/{id}
        // A single approved vocabulary entry.
        .route("/vocab/{id}", get(handlers::get_vocab))
}
