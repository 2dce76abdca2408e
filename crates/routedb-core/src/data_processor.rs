//! OpenFlights `.dat` loader.
//!
//! The dump is headerless CSV with `\N` standing for null. Rows whose key
//! columns cannot be parsed are skipped and counted, never fatal.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::types::{Airline, Airport, Dataset, RouteRecord};

pub const AIRPORTS_FILE: &str = "airports.dat";
pub const AIRLINES_FILE: &str = "airlines.dat";
pub const ROUTES_FILE: &str = "routes.dat";

/// Paths of the three OpenFlights files found under a data directory.
#[derive(Debug, Clone)]
pub struct OpenFlightsFiles {
    pub airports: PathBuf,
    pub airlines: PathBuf,
    pub routes: PathBuf,
}

/// `"{SOURCE}-{DEST}"`, uppercased. Shared by ingestion and queries.
pub fn route_text(source: &str, dest: &str) -> String {
    format!("{}-{}", source.trim().to_uppercase(), dest.trim().to_uppercase())
}

#[derive(Default)]
pub struct DataProcessor;

impl DataProcessor {
    pub fn new() -> Self { Self }

    /// Find the three data files anywhere under `data_dir` (first match wins, sorted walk).
    pub fn locate(&self, data_dir: &Path) -> Result<OpenFlightsFiles> {
        let mut airports = None; let mut airlines = None; let mut routes = None;
        for entry in walkdir::WalkDir::new(data_dir).max_depth(3).sort_by_file_name().into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let slot = match entry.file_name().to_str() {
                Some(AIRPORTS_FILE) => &mut airports,
                Some(AIRLINES_FILE) => &mut airlines,
                Some(ROUTES_FILE) => &mut routes,
                _ => continue,
            };
            if slot.is_none() { *slot = Some(entry.path().to_path_buf()); }
        }
        let missing = |name: &str| anyhow::anyhow!("{} not found under {}", name, data_dir.display());
        Ok(OpenFlightsFiles {
            airports: airports.ok_or_else(|| missing(AIRPORTS_FILE))?,
            airlines: airlines.ok_or_else(|| missing(AIRLINES_FILE))?,
            routes: routes.ok_or_else(|| missing(ROUTES_FILE))?,
        })
    }

    pub fn load_dataset(&self, data_dir: &Path) -> Result<Dataset> {
        let files = self.locate(data_dir)?;
        let open = |p: &Path| File::open(p).with_context(|| format!("opening {}", p.display()));
        let airports = self.read_airports(open(files.airports.as_path())?)?;
        let airlines = self.read_airlines(open(files.airlines.as_path())?)?;
        let routes = self.read_routes(open(files.routes.as_path())?)?;
        tracing::info!(airports = airports.len(), airlines = airlines.len(), routes = routes.len(), dir = %data_dir.display(), "loaded OpenFlights data");
        Ok(Dataset { airports, airlines, routes })
    }

    /// Columns: id, name, city, country, iata, icao, latitude, longitude, ...
    pub fn read_airports<R: Read>(&self, reader: R) -> Result<Vec<Airport>> {
        let mut out = Vec::new(); let mut skipped = 0usize;
        for row in csv_reader(reader).records() {
            let row = row.context("reading airports")?;
            let Some(id) = int_field(&row, 0) else { skipped += 1; continue; };
            out.push(Airport {
                id,
                name: text_field(&row, 1).unwrap_or_default(),
                city: text_field(&row, 2).unwrap_or_default(),
                country: text_field(&row, 3).unwrap_or_default(),
                iata: text_field(&row, 4),
                icao: text_field(&row, 5),
                latitude: text_field(&row, 6).and_then(|s| s.parse().ok()),
                longitude: text_field(&row, 7).and_then(|s| s.parse().ok()),
            });
        }
        if skipped > 0 { tracing::warn!(skipped, "skipped airport rows without a numeric id"); }
        Ok(out)
    }

    /// Columns: id, name, alias, iata, icao, callsign, country, active (Y/N).
    pub fn read_airlines<R: Read>(&self, reader: R) -> Result<Vec<Airline>> {
        let mut out = Vec::new(); let mut skipped = 0usize;
        for row in csv_reader(reader).records() {
            let row = row.context("reading airlines")?;
            let Some(id) = int_field(&row, 0) else { skipped += 1; continue; };
            out.push(Airline {
                id,
                name: text_field(&row, 1).unwrap_or_default(),
                alias: text_field(&row, 2),
                iata: text_field(&row, 3),
                icao: text_field(&row, 4),
                callsign: text_field(&row, 5),
                country: text_field(&row, 6),
                active: text_field(&row, 7).as_deref() == Some("Y"),
            });
        }
        if skipped > 0 { tracing::warn!(skipped, "skipped airline rows without a numeric id"); }
        Ok(out)
    }

    /// Columns: airline, airline_id, source, source_id, dest, dest_id, codeshare, stops, equipment.
    /// Rows without both airport ids are dropped; ids are assigned 1-based after filtering.
    pub fn read_routes<R: Read>(&self, reader: R) -> Result<Vec<RouteRecord>> {
        let mut out: Vec<RouteRecord> = Vec::new(); let mut skipped = 0usize;
        for row in csv_reader(reader).records() {
            let row = row.context("reading routes")?;
            let (Some(source_id), Some(dest_id)) = (int_field(&row, 3), int_field(&row, 5)) else { skipped += 1; continue; };
            let source_code = text_field(&row, 2).unwrap_or_default();
            let dest_code = text_field(&row, 4).unwrap_or_default();
            out.push(RouteRecord {
                id: out.len() + 1,
                carrier_code: text_field(&row, 0).unwrap_or_default(),
                airline_id: int_field(&row, 1),
                route_text: route_text(&source_code, &dest_code),
                source_code,
                source_id,
                dest_code,
                dest_id,
                codeshare: text_field(&row, 6),
                stops: text_field(&row, 7).and_then(|s| s.parse().ok()).unwrap_or(0),
                equipment: text_field(&row, 8),
            });
        }
        if skipped > 0 { tracing::warn!(skipped, "skipped route rows without source/destination airport ids"); }
        Ok(out)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(reader)
}

fn text_field(row: &csv::StringRecord, idx: usize) -> Option<String> {
    let v = row.get(idx)?.trim();
    if v.is_empty() || v == "\\N" { None } else { Some(v.to_string()) }
}

fn int_field(row: &csv::StringRecord, idx: usize) -> Option<i64> {
    text_field(row, idx)?.parse().ok()
}
