use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{MediaBackend, MetadataProvider},
        CollectionStore, TitleLookup,
    },
};

pub mod collection;
pub mod lookup;
pub mod recommendations;
pub mod stats;

/// Shared state behind every handler
pub struct AppState {
    pub collection: CollectionStore,
    pub lookup: TitleLookup,
    pub metadata: Arc<dyn MetadataProvider>,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        metadata: Arc<dyn MetadataProvider>,
        primary_region: impl Into<String>,
        fallback_region: impl Into<String>,
    ) -> Self {
        Self {
            collection: CollectionStore::new(backend),
            lookup: TitleLookup::new(metadata.clone(), primary_region, fallback_region),
            metadata,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replaces the random source so recommendation picks are reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Independent generator derived from the shared one
    ///
    /// Handlers hold the result across awaits; the shared lock is released
    /// immediately.
    pub fn fork_rng(&self) -> StdRng {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        StdRng::seed_from_u64(rng.gen())
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/collection",
            get(collection::list).post(collection::create),
        )
        .route("/collection/refresh", post(collection::refresh))
        .route(
            "/collection/:id",
            get(collection::get_item)
                .put(collection::update)
                .delete(collection::delete),
        )
        .route("/stats", get(stats::stats))
        .route("/recommendation", get(recommendations::recommend))
        .route("/lookup/search", get(lookup::search))
        .route("/lookup/:kind/:id", get(lookup::prefill))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
