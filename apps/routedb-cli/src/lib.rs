//! Helpers shared by the `routedb-*` binaries.

use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use routedb_core::config::{Config, DEFAULT_INDEX_DIR, DEFAULT_RAW_DIR};

const DEFAULT_FILTER: &str =
    "routedb_core=info,routedb_text=info,routedb_vector=info,routedb_service=info,routedb_api=info,tower_http=info,warn";

/// `RUST_LOG` wins when set; otherwise info for our crates (debug with `verbose`).
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose { EnvFilter::new(DEFAULT_FILTER.replace("=info", "=debug")) } else { EnvFilter::new(DEFAULT_FILTER) }
    });
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

pub fn load_config(dir: &Path) -> anyhow::Result<Config> {
    Config::load_from(dir).map_err(|e| { eprintln!("Error loading config: {}", e); e })
}

/// Resolve `(raw_dir, index_dir)`: CLI flag first, then config, then defaults.
pub fn data_dirs(config: &Config, raw_dir: Option<PathBuf>, index_dir: Option<PathBuf>) -> (PathBuf, PathBuf) {
    (
        raw_dir.unwrap_or_else(|| config.path_or("data.raw_dir", DEFAULT_RAW_DIR)),
        index_dir.unwrap_or_else(|| config.path_or("data.index_dir", DEFAULT_INDEX_DIR)),
    )
}
