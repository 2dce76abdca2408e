//! Build, persist and restore a [`Catalog`].
//!
//! `persist` writes `catalog.json` (airports and airlines) next to the index
//! snapshot and records its checksum in the snapshot manifest, which is written
//! last. `restore` only accepts a `catalog.json` whose hash matches that
//! manifest, so a half-finished persist never pairs new tables with an old index.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use routedb_core::data_processor::DataProcessor;
use routedb_core::types::{Airline, Airport, Dataset, VectorizerConfig};
use routedb_vector::snapshot::{read_attachment, write_json_checked};
use routedb_vector::{Manifest, SimilarityIndex};

use crate::catalog::Catalog;

pub const CATALOG_FILE: &str = "catalog.json";

#[derive(Serialize)]
struct CatalogRef<'a> {
    airports: &'a [Airport],
    airlines: &'a [Airline],
}

#[derive(Deserialize)]
struct CatalogFile {
    airports: Vec<Airport>,
    airlines: Vec<Airline>,
}

/// Load the OpenFlights files under `raw_dir` and build a fresh catalog.
pub fn ingest(raw_dir: &Path, config: VectorizerConfig) -> Result<Catalog> {
    let started = Instant::now();
    let Dataset { airports, airlines, routes } = DataProcessor::new()
        .load_dataset(raw_dir)
        .with_context(|| format!("loading OpenFlights data from {}", raw_dir.display()))?;
    let index = SimilarityIndex::build(routes, config)?;
    let catalog = Catalog::new(airports, airlines, index);
    tracing::info!(
        airports = catalog.airports.len(),
        airlines = catalog.airlines.len(),
        routes = catalog.routes().len(),
        model_id = catalog.model_id(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ingestion complete"
    );
    Ok(catalog)
}

pub fn persist(catalog: &Catalog, index_dir: &Path) -> Result<Manifest> {
    fs::create_dir_all(index_dir).with_context(|| format!("creating {}", index_dir.display()))?;
    let checksum = write_json_checked(
        &index_dir.join(CATALOG_FILE),
        &CatalogRef { airports: &catalog.airports, airlines: &catalog.airlines },
    )?;
    catalog.service.index().save_with(index_dir, BTreeMap::from([(CATALOG_FILE.to_string(), checksum)]))
}

/// Reload a catalog written by [`persist`]. Without a snapshot this fails with
/// `UnknownModel`; a `catalog.json` from another persist fails with `Operation`
/// (both recoverable through `downcast_ref`).
pub fn restore(index_dir: &Path) -> Result<Catalog> {
    let (index, manifest) = SimilarityIndex::load_with_manifest(index_dir)?;
    let file: CatalogFile = read_attachment(index_dir, &manifest, CATALOG_FILE)?;
    Ok(Catalog::new(file.airports, file.airlines, index))
}
