//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - [`AppState`], the repositories and pool injected into every handler
//! - The application router with tracing and CORS layers
//! - The health endpoint

pub mod routes;

use std::sync::Arc;

use axum::Router;
use ledgerly_db::Repositories;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Repositories built once at startup.
    pub repos: Repositories,
}

impl AppState {
    /// Builds the state around a connected pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            repos: Repositories::new(Arc::clone(&db)),
            db,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
