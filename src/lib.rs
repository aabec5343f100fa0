//! MovieMate client core: collection store, filtering, chart aggregates,
//! catalog auto-fill and genre-based recommendations, served to the UI through a
//! small JSON gateway.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{create_router, AppState};
