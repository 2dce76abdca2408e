//! Request handlers and shared application state.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use routedb_core::types::{Airport, AirportId, RouteRecord, SimilarityResult, VectorizerConfig};
use routedb_service::analytics::{
    AirlineTraffic, AirportTraffic, CountryCount, PopularRoute, Stats, DEFAULT_COUNTRY_LIMIT, DEFAULT_RANKING_LIMIT,
};
use routedb_service::search::{DEFAULT_AIRPORT_LIMIT, DEFAULT_ROUTE_LIMIT};
use routedb_service::{ingest, persist, Catalog, ModelSlot};

use crate::errors::ApiError;
use crate::models::*;

/// Shared state handed to every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub slot: ModelSlot,
    /// OpenFlights directory read by `POST /api/admin/ingest-data`.
    pub raw_dir: PathBuf,
    /// Where a fresh ingestion is persisted; `None` keeps it in memory only.
    pub index_dir: Option<PathBuf>,
    pub vectorizer: VectorizerConfig,
    /// Held for the whole of an ingestion; one writer per index directory.
    pub ingest_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(slot: ModelSlot, raw_dir: PathBuf, index_dir: Option<PathBuf>, vectorizer: VectorizerConfig) -> Self {
        Self { slot, raw_dir, index_dir, vectorizer, ingest_lock: Arc::new(Mutex::new(())) }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;

pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo { message: "Flight route recommendation API".to_string(), version: env!("CARGO_PKG_VERSION").to_string() })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (model_id, routes) = match state.slot.get().await {
        Ok(catalog) => (Some(catalog.model_id().to_string()), catalog.routes().len()),
        Err(_) => (None, 0),
    };
    Json(HealthResponse { status: "ok".to_string(), model_loaded: model_id.is_some(), model_id, routes })
}

pub async fn similar_routes(State(state): State<AppState>, query: QueryParams<RecommendQuery>) -> ApiResult<Vec<SimilarityResult>> {
    let Query(q) = query?;
    let source = required("source", &q.source)?;
    let dest = required("destination", &q.destination)?;
    let k = top_k(q.top_k)?;
    let catalog = state.slot.get().await?;
    Ok(Json(catalog.service.recommend(source, dest, k)?))
}

pub async fn direct_routes(State(state): State<AppState>, query: QueryParams<RouteQuery>) -> ApiResult<Vec<RouteRecord>> {
    let Query(q) = query?;
    let source = required("source", &q.source)?;
    let dest = required("destination", &q.destination)?;
    let catalog = state.slot.get().await?;
    Ok(Json(catalog.service.direct_routes(source, dest)?))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Stats> {
    Ok(Json(state.slot.get().await?.stats()))
}

pub async fn busiest_airports(State(state): State<AppState>, query: QueryParams<LimitQuery>) -> ApiResult<Vec<AirportTraffic>> {
    let Query(q) = query?;
    Ok(Json(state.slot.get().await?.busiest_airports(q.limit.unwrap_or(DEFAULT_RANKING_LIMIT))?))
}

pub async fn top_airlines(State(state): State<AppState>, query: QueryParams<LimitQuery>) -> ApiResult<Vec<AirlineTraffic>> {
    let Query(q) = query?;
    Ok(Json(state.slot.get().await?.top_airlines(q.limit.unwrap_or(DEFAULT_RANKING_LIMIT))?))
}

pub async fn popular_routes(State(state): State<AppState>, query: QueryParams<LimitQuery>) -> ApiResult<Vec<PopularRoute>> {
    let Query(q) = query?;
    Ok(Json(state.slot.get().await?.popular_routes(q.limit.unwrap_or(DEFAULT_RANKING_LIMIT))?))
}

pub async fn airports_by_country(State(state): State<AppState>, query: QueryParams<LimitQuery>) -> ApiResult<Vec<CountryCount>> {
    let Query(q) = query?;
    Ok(Json(state.slot.get().await?.airports_by_country(q.limit.unwrap_or(DEFAULT_COUNTRY_LIMIT))?))
}

pub async fn search_airports(State(state): State<AppState>, query: QueryParams<SearchQuery>) -> ApiResult<Vec<Airport>> {
    let Query(q) = query?;
    let text = required("q", &q.q)?;
    let catalog = state.slot.get().await?;
    Ok(Json(catalog.search_airports(text, q.limit.unwrap_or(DEFAULT_AIRPORT_LIMIT))?))
}

pub async fn routes_for_airport(
    State(state): State<AppState>,
    path: Result<Path<AirportId>, PathRejection>,
    query: QueryParams<LimitQuery>,
) -> ApiResult<Vec<RouteRecord>> {
    let Path(airport_id) = path?;
    let Query(q) = query?;
    let catalog = state.slot.get().await?;
    Ok(Json(catalog.routes_for_airport(airport_id, q.limit.unwrap_or(DEFAULT_ROUTE_LIMIT))?))
}

/// Rebuild the catalog from `raw_dir` on a blocking thread, persist it when an
/// index directory is configured, then swap it into the slot. Ingestions run
/// one at a time.
pub async fn ingest_data(State(state): State<AppState>) -> ApiResult<IngestResponse> {
    let _guard = state.ingest_lock.lock().await;
    let AppState { raw_dir, index_dir, vectorizer, .. } = state.clone();
    tracing::info!(raw_dir = %raw_dir.display(), "ingestion requested");
    let catalog = tokio::task::spawn_blocking(move || -> anyhow::Result<Catalog> {
        let catalog = ingest(&raw_dir, vectorizer)?;
        if let Some(dir) = &index_dir { persist(&catalog, dir)?; }
        Ok(catalog)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("ingestion task failed: {e}")))??;

    let data = IngestCounts { airports: catalog.airports.len(), airlines: catalog.airlines.len(), routes: catalog.routes().len() };
    state.slot.install(catalog).await;
    Ok(Json(IngestResponse { status: "success".to_string(), data }))
}
