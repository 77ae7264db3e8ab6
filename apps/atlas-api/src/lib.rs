//! Atlas API - HTTP surface over the jurisdiction and incentive engine
//!
//! Provides REST endpoints for:
//! - Jurisdiction directory pages (state / county / city)
//! - Incentive program matching
//! - Regulation aggregation

pub mod error;
pub mod handlers;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Jurisdiction directory pages
        .route("/api/jurisdictions/:state", get(handlers::state_page))
        .route(
            "/api/jurisdictions/:state/:county",
            get(handlers::county_page),
        )
        .route(
            "/api/jurisdictions/:state/:county/:city",
            get(handlers::city_page),
        )
        // Engine operations by jurisdiction id
        .route("/api/incentives/:jurisdiction_id", get(handlers::incentives))
        .route(
            "/api/regulations/:jurisdiction_id",
            get(handlers::regulations),
        )
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
