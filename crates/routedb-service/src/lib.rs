//! routedb-service
//!
//! Everything a caller queries once an index exists: route recommendations,
//! direct lookups, traffic analytics and airport search, all read from an
//! immutable [`Catalog`]. The [`ModelSlot`] holds the catalog currently being
//! served and [`ingest`] builds a new one from OpenFlights files.

pub mod analytics;
pub mod catalog;
pub mod ingest;
pub mod recommend;
pub mod search;
pub mod slot;

pub use catalog::Catalog;
pub use ingest::{ingest, persist, restore};
pub use recommend::QueryService;
pub use slot::ModelSlot;
