use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod services;
pub mod slug;
pub mod token;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point.
pub use clock::{Clock, ClockState, SystemClock};
pub use config::AppConfig;
pub use error::AppError;
pub use password::{Argon2Hasher, CredentialHasher, HasherState};
pub use repository::Repositories;
pub use services::Services;
pub use token::TokenService;

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) from every
/// handler decorated with `#[utoipa::path]` and every schema derived with
/// `ToSchema`. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register, handlers::auth::login,
        handlers::me::get_me, handlers::me::update_me,
        handlers::topics::list_topics, handlers::topics::get_topic,
        handlers::topics::list_topic_vocab,
        handlers::vocab::search_vocab, handlers::vocab::get_vocab,
        handlers::vocab::contribute_vocab,
        handlers::user_vocab::list_my_vocab, handlers::user_vocab::add_my_vocab,
        handlers::user_vocab::update_my_vocab, handlers::user_vocab::remove_my_vocab,
        handlers::admin_users::list_users, handlers::admin_users::export_users,
        handlers::admin_users::create_user, handlers::admin_users::update_user,
        handlers::admin_users::delete_user, handlers::admin_users::reset_password,
        handlers::admin_users::restore_user,
        handlers::admin_topics::search_topics, handlers::admin_topics::export_topics,
        handlers::admin_topics::create_topic, handlers::admin_topics::update_topic,
        handlers::admin_topics::delete_topic,
        handlers::admin_vocab::approve_vocab, handlers::admin_vocab::reject_vocab
    ),
    components(
        schemas(
            models::UserRole, models::UserStatus, models::TopicStatus,
            models::VocabStatus, models::LearningStatus,
            models::RegisterRequest, models::LoginRequest, models::LoginResponse,
            models::UserResponse, models::UpdateMeRequest,
            models::AdminUpdateUserRequest, models::AdminResetPasswordRequest,
            models::CreateTopicRequest, models::UpdateTopicRequest,
            models::TopicResponse, models::CreateVocabularyRequest,
            models::VocabularyResponse, models::AddUserVocabularyRequest,
            models::UpdateUserVocabularyRequest, models::UserVocabularyResponse,
        )
    ),
    tags(
        (name = "lexhub", description = "Vocabulary learning platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across every incoming request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer handles (also used directly by the auth extractor).
    pub repos: Repositories,
    /// The service layer: all operations exposed to the handlers.
    pub services: Services,
    /// Session token issuance and validation.
    pub tokens: TokenService,
    /// Time source for handler-level timestamps.
    pub clock: ClockState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let the AuthUser extractor pull exactly the components it needs from
// the shared state.

impl FromRef<AppState> for Repositories {
    fn from_ref(app_state: &AppState) -> Repositories {
        app_state.repos.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the authenticated route group. The `AuthUser`
/// extractor performs the actual token validation and live-user lookup; a
/// failure rejects the request before the handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the full routing structure, applies global and scoped
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // CORS: permissive; the API is bearer-token authenticated, not
    // cookie-based.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: protected by the auth middleware.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: nested under '/admin'. Authentication comes from the
        // AuthUser extractor in each handler; the role check happens inside
        // the service operations.
        .nest("/admin", admin::admin_routes())
        .with_state(state);

    // Observability and correlation layers, applied outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing: the whole request/response lifecycle in a
                // span correlated by the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the tracing span creation so every log line for a single
/// request carries the `x-request-id` alongside method and URI.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
