use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// AppError
///
/// The application-level failure taxonomy. Every service operation returns
/// `Result<T, AppError>`; the variant carries the business meaning and maps
/// onto an HTTP status plus a stable machine-readable error code at the
/// response boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Uniqueness conflicts.
    #[error("Email already exists")]
    EmailExists,
    #[error("Name already exists")]
    TopicNameExists,
    #[error("Vocabulary already exists")]
    VocabExists,
    #[error("Vocabulary already added")]
    UserVocabExists,
    /// Fallback for a storage-level unique/integrity violation that does not
    /// correspond to a named application constraint.
    #[error("Data integrity violation")]
    DataIntegrity,

    // Authentication / authorization.
    /// Deliberately identical for "no such account" and "wrong password".
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User is not active")]
    UserNotActive,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access is denied")]
    AccessDenied,

    // Missing or logically absent (soft-deleted) entities.
    #[error("User not found")]
    UserNotFound,
    #[error("Topic not found")]
    TopicNotFound,
    #[error("Vocabulary not found")]
    VocabNotFound,
    #[error("User vocabulary not found")]
    UserVocabNotFound,

    // Input / state validation.
    #[error("Name is required")]
    InvalidName,
    #[error("Term is required")]
    InvalidTerm,
    #[error("Language is required")]
    InvalidLanguage,
    #[error("Definition is required")]
    InvalidDefinition,
    #[error("Progress must be between 0 and 100")]
    InvalidProgress,
    #[error("Topic is inactive")]
    TopicInactive,
    #[error("{0}")]
    Validation(String),

    // Infrastructure.
    #[error("Unexpected storage error: {0}")]
    Database(sqlx::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmailExists
            | AppError::TopicNameExists
            | AppError::VocabExists
            | AppError::UserVocabExists
            | AppError::DataIntegrity => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UserNotActive | AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::TopicNotFound
            | AppError::VocabNotFound
            | AppError::UserVocabNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidName
            | AppError::InvalidTerm
            | AppError::InvalidLanguage
            | AppError::InvalidDefinition
            | AppError::InvalidProgress
            | AppError::TopicInactive
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error code string used by clients to branch on failure kinds.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::EmailExists => "EMAIL_EXISTS",
            AppError::TopicNameExists => "TOPIC_NAME_EXISTS",
            AppError::VocabExists => "VOCAB_EXISTS",
            AppError::UserVocabExists => "USER_VOCAB_EXISTS",
            AppError::DataIntegrity => "DATA_INTEGRITY_VIOLATION",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::UserNotActive => "USER_NOT_ACTIVE",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::AccessDenied => "ACCESS_DENIED",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::TopicNotFound => "TOPIC_NOT_FOUND",
            AppError::VocabNotFound => "VOCAB_NOT_FOUND",
            AppError::UserVocabNotFound => "USER_VOCAB_NOT_FOUND",
            AppError::InvalidName => "INVALID_NAME",
            AppError::InvalidTerm => "INVALID_TERM",
            AppError::InvalidLanguage => "INVALID_LANGUAGE",
            AppError::InvalidDefinition => "INVALID_DEFINITION",
            AppError::InvalidProgress => "INVALID_PROGRESS",
            AppError::TopicInactive => "TOPIC_INACTIVE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// Maps a violated database constraint back onto the conflict kind the
    /// in-process check would have produced. This is the backstop for races
    /// that slip past the application-level uniqueness checks.
    pub fn from_constraint(constraint: &str) -> AppError {
        if constraint.contains("uk_users_email") {
            AppError::EmailExists
        } else if constraint.contains("uk_topics_slug") || constraint.contains("uk_topics_name") {
            AppError::TopicNameExists
        } else if constraint.contains("uk_vocab_term_language") {
            AppError::VocabExists
        } else if constraint.contains("uk_user_vocab") {
            AppError::UserVocabExists
        } else {
            AppError::DataIntegrity
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                if let Some(constraint) = db_err.constraint() {
                    return AppError::from_constraint(constraint);
                }
                return AppError::DataIntegrity;
            }
        }
        AppError::Database(err)
    }
}

/// ApiErrorResponse
///
/// The JSON error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }
        let body = ApiErrorResponse {
            timestamp: Utc::now(),
            code: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
