use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MediaDraft, MediaId, MediaItem, Status},
    routes::AppState,
    services::{filter, CollectionSnapshot, DeleteConfirmation, FilterQuery, GenreMatch, Selection},
};

/// Notice rendered when the backend can't be read
pub const LOAD_FAILED_NOTICE: &str = "Could not load your collection. Is the backend running?";

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub genre_match: Option<GenreMatch>,
}

impl From<CollectionQuery> for FilterQuery {
    /// Status names match exactly; anything else selects nothing
    fn from(query: CollectionQuery) -> Self {
        let status = match Selection::from_param(query.status.as_deref()) {
            Selection::All => Selection::All,
            Selection::Only(name) => Selection::Only(Status::from_name(&name)),
        };

        FilterQuery {
            search_title: query.search.unwrap_or_default(),
            status,
            platform: Selection::from_param(query.platform.as_deref()),
            genre: Selection::from_param(query.genre.as_deref()),
            genre_match: query.genre_match.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// One card in the collection view
#[derive(Debug, Serialize)]
pub struct MediaItemView {
    #[serde(flatten)]
    pub item: MediaItem,
    pub progress_percent: Option<f64>,
}

impl From<&MediaItem> for MediaItemView {
    fn from(item: &MediaItem) -> Self {
        Self {
            progress_percent: item.details.progress_percent(),
            item: item.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionView {
    pub items: Vec<MediaItemView>,
    /// Size of the whole collection
    pub total: usize,
    /// Items passing the filter
    pub visible: usize,
    pub loaded: bool,
    pub notice: Option<String>,
}

impl CollectionView {
    fn render(snapshot: &CollectionSnapshot, query: &FilterQuery) -> Self {
        let visible = filter(&snapshot.items, query);
        Self {
            total: snapshot.items.len(),
            visible: visible.len(),
            items: visible.iter().map(MediaItemView::from).collect(),
            loaded: snapshot.loaded,
            notice: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            visible: 0,
            loaded: false,
            notice: Some(LOAD_FAILED_NOTICE.to_string()),
        }
    }
}

/// Handler for the filtered collection view
///
/// A backend that can't be reached renders as an empty view with a notice.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CollectionQuery>,
) -> AppResult<Json<CollectionView>> {
    let query = FilterQuery::from(params);

    match state.collection.list().await {
        Ok(_) => Ok(Json(CollectionView::render(
            &state.collection.snapshot(),
            &query,
        ))),
        Err(e) if e.is_network_failure() => {
            tracing::warn!(error = %e, "Collection unavailable");
            Ok(Json(CollectionView::unavailable()))
        }
        Err(e) => Err(e),
    }
}

/// Handler forcing a refetch from the backend
pub async fn refresh(State(state): State<Arc<AppState>>) -> AppResult<Json<CollectionView>> {
    let snapshot = state.collection.refresh().await?;
    Ok(Json(CollectionView::render(&snapshot, &FilterQuery::default())))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<MediaItem>> {
    let id = MediaId(id);
    state
        .collection
        .list()
        .await?
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Media {} not found", id)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(draft): Json<MediaDraft>,
) -> AppResult<(StatusCode, Json<MediaItem>)> {
    tracing::info!(request_id = %request_id, title = %draft.title, "Adding media");

    let item = state.collection.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(draft): Json<MediaDraft>,
) -> AppResult<Json<MediaItem>> {
    tracing::info!(request_id = %request_id, id = id, "Updating media");

    let item = state.collection.update(MediaId(id), draft).await?;
    Ok(Json(item))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteQuery>,
) -> AppResult<StatusCode> {
    let confirmation = DeleteConfirmation::from_answer(params.confirm)?;
    tracing::info!(request_id = %request_id, id = id, "Deleting media");

    state.collection.delete(MediaId(id), confirmation).await?;
    Ok(StatusCode::NO_CONTENT)
}
