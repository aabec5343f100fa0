use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::AppResult,
    models::Status,
    routes::{collection::LOAD_FAILED_NOTICE, AppState},
    services::aggregate::{status_counts, top_genres, GenreCount, DEFAULT_TOP_GENRES},
};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub top: Option<usize>,
}

/// Data behind the status and genre pie charts
#[derive(Debug, Serialize)]
pub struct StatsView {
    pub total: usize,
    pub status_counts: BTreeMap<Status, usize>,
    pub top_genres: Vec<GenreCount>,
    pub notice: Option<String>,
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> AppResult<Json<StatsView>> {
    let top = params.top.unwrap_or(DEFAULT_TOP_GENRES);

    match state.collection.list().await {
        Ok(items) => Ok(Json(StatsView {
            total: items.len(),
            status_counts: status_counts(&items),
            top_genres: top_genres(&items, top),
            notice: None,
        })),
        Err(e) if e.is_network_failure() => {
            tracing::warn!(error = %e, "Stats unavailable");
            Ok(Json(StatsView {
                total: 0,
                status_counts: BTreeMap::new(),
                top_genres: Vec::new(),
                notice: Some(LOAD_FAILED_NOTICE.to_string()),
            }))
        }
        Err(e) => Err(e),
    }
}
