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
    error::AppError,
    filters::VocabSearchFilter,
    models::{CreateVocabularyRequest, Page, PageParams, VocabularyResponse},
};

/// Public vocabulary search parameters. There is no status parameter: this
/// endpoint only ever sees APPROVED entries.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct VocabSearchQuery {
    /// Substring match against the normalized term.
    pub query: Option<String>,
    /// Scope the search to a single topic's vocabulary.
    pub topic_id: Option<Uuid>,
    /// Exact language code match.
    pub language: Option<String>,
}

/// search_vocab
///
/// [Public Route] Searches approved vocabulary. All present criteria are
/// AND-combined; blank criteria are ignored.
#[utoipa::path(
    get,
    path = "/vocab",
    params(VocabSearchQuery, PageParams),
    responses((status = 200, description = "Approved vocabulary page"))
)]
pub async fn search_vocab(
    State(state): State<AppState>,
    Query(query): Query<VocabSearchQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<VocabularyResponse>>, AppError> {
    let filter = VocabSearchFilter {
        query: query.query,
        topic_id: query.topic_id,
        language: query.language,
        status: None,
    };
    Ok(Json(
        state.services.vocab.search_approved(filter, page).await?,
    ))
}

/// get_vocab
///
/// [Public Route] A single approved vocabulary entry by id. Pending,
/// rejected, and soft-deleted entries are 404 here.
#[utoipa::path(
    get,
    path = "/vocab/{id}",
    params(("id" = Uuid, Path, description = "Vocabulary ID")),
    responses(
        (status = 200, description = "Found", body = VocabularyResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vocab(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VocabularyResponse>, AppError> {
    Ok(Json(state.services.vocab.get_approved(id).await?))
}

/// contribute_vocab
///
/// [Authenticated Route] Submits a new vocabulary entry for moderation. The
/// entry is stored as PENDING together with its topic links, all or nothing.
#[utoipa::path(
    post,
    path = "/vocab/contributions",
    request_body = CreateVocabularyRequest,
    responses(
        (status = 201, description = "Submitted", body = VocabularyResponse),
        (status = 409, description = "Vocabulary already exists")
    )
)]
pub async fn contribute_vocab(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateVocabularyRequest>,
) -> Result<(StatusCode, Json<VocabularyResponse>), AppError> {
    let vocab = state.services.vocab.contribute(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(vocab)))
}
