//! Axum router for every `/api` endpoint.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        // Recommendations
        .route("/api/recommendations/similar-routes", get(handlers::similar_routes))
        .route("/api/recommendations/direct-routes", get(handlers::direct_routes))
        // Analytics
        .route("/api/analytics/stats", get(handlers::stats))
        .route("/api/analytics/busiest-airports", get(handlers::busiest_airports))
        .route("/api/analytics/top-airlines", get(handlers::top_airlines))
        .route("/api/analytics/popular-routes", get(handlers::popular_routes))
        .route("/api/analytics/airports-by-country", get(handlers::airports_by_country))
        // Search
        .route("/api/search/airports", get(handlers::search_airports))
        .route("/api/search/routes/{airport_id}", get(handlers::routes_for_airport))
        // Admin
        .route("/api/admin/ingest-data", post(handlers::ingest_data))
        .with_state(state)
}
