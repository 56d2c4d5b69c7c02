//! emlpub Server - HTTP front for the publish pipeline
//!
//! Routes:
//! - `GET|POST /api/publishPackage` runs the pipeline for one package
//! - `GET /api/listPackages` lists a package's metadata documents
//! - `GET /health`

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health_check))
        .route(
            "/api/publishPackage",
            get(api::publish_package).post(api::publish_package),
        )
        .route("/api/listPackages", get(api::list_packages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
