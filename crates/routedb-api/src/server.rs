//! REST server startup.

use anyhow::Result;
use axum::http::HeaderValue;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::AppState;
use crate::routing::create_router;

/// `*` (or no origins) allows any origin; otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(allowed)).allow_methods(Any).allow_headers(Any)
}

pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    create_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors_layer(cors_origins)))
}

/// Serve until Ctrl-C.
pub async fn start_server(addr: SocketAddr, state: AppState, cors_origins: &[String]) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "route API listening");
    axum::serve(listener, app(state, cors_origins))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
    tracing::info!("route API shut down");
    Ok(())
}
