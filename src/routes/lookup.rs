use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{LookupCandidate, LookupKind, MediaDraft},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for the auto-fill search box
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<LookupCandidate>>> {
    let candidates = state.lookup.search(&params.q).await?;
    Ok(Json(candidates))
}

/// Handler returning a draft pre-filled from one search hit
pub async fn prefill(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, u64)>,
) -> AppResult<Json<MediaDraft>> {
    let kind: LookupKind = kind.parse()?;
    let draft = state.lookup.prefill(kind, id).await?;
    Ok(Json(draft))
}
