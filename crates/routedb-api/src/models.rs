//! Query parameters and response bodies.

use serde::{Deserialize, Serialize};

use routedb_core::error::Error;

pub const DEFAULT_TOP_K: usize = 10;
pub const MAX_TOP_K: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// A required query parameter; absent counts as an invalid query.
pub fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, Error> {
    value.as_deref().ok_or_else(|| Error::InvalidQuery(format!("missing query parameter `{name}`")))
}

pub fn top_k(value: Option<usize>) -> Result<usize, Error> {
    let k = value.unwrap_or(DEFAULT_TOP_K);
    if k == 0 || k > MAX_TOP_K {
        return Err(Error::InvalidQuery(format!("top_k must be between 1 and {MAX_TOP_K}, got {k}")));
    }
    Ok(k)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub routes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestCounts {
    pub airports: usize,
    pub airlines: usize,
    pub routes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub data: IngestCounts,
}
