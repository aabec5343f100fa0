use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::RecommendationCandidate,
    routes::AppState,
    services::recommendations,
};

pub const NOTHING_NEW_MESSAGE: &str =
    "You've already got every popular title in your favourite genre. Check back later!";

/// Outcome shown in the recommendation modal
///
/// A failed discovery call is not one of these: it surfaces as an error
/// response so the UI can tell "service failed" from "nothing new".
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationResponse {
    Recommended { candidate: RecommendationCandidate },
    NothingNew { message: String },
}

/// Handler for the "recommend something new" button
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RecommendationResponse>> {
    let items = state.collection.list().await?;
    let mut rng = state.fork_rng();

    let candidate = recommendations::recommend(&items, state.metadata.as_ref(), &mut rng).await?;

    tracing::info!(
        request_id = %request_id,
        found = candidate.is_some(),
        "Recommendation completed"
    );

    Ok(Json(match candidate {
        Some(candidate) => RecommendationResponse::Recommended { candidate },
        None => RecommendationResponse::NothingNew {
            message: NOTHING_NEW_MESSAGE.to_string(),
        },
    }))
}
