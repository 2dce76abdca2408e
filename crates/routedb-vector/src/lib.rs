//! routedb-vector
//!
//! In-memory similarity index over route vectors: `index` builds it from route
//! records, `search` ranks stored routes by cosine similarity, and `snapshot`
//! persists and reloads a built index without refitting.

pub mod index;
pub mod search;
pub mod snapshot;

pub use index::SimilarityIndex;
pub use snapshot::Manifest;
