//! On-disk snapshot of a built index.
//!
//! Layout under the index directory:
//! - `index.json`: vectorizer, records and vectors
//! - `index.json.blake3`: hex checksum of `index.json`
//! - `manifest.json`: model id, build time, counts, the checksum of
//!   `index.json` and of any attached files, written last
//!
//! Files are written to a temporary name and renamed into place, so a reader
//! never sees a half-written payload under the final name. A file only belongs
//! to a snapshot when its hash matches the manifest.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use routedb_core::error::Error;
use routedb_core::traits::RouteVectorizer;
use routedb_core::types::{RouteRecord, SparseVector};
use routedb_text::TfidfVectorizer;

use crate::index::SimilarityIndex;

pub const INDEX_FILE: &str = "index.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub model_id: String,
    pub built_at: DateTime<Utc>,
    pub records: usize,
    pub vocabulary: usize,
    pub checksum: String,
    /// File name (relative to the snapshot dir) to blake3 checksum.
    #[serde(default)]
    pub attachments: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    vectorizer: &'a TfidfVectorizer,
    records: &'a [RouteRecord],
    vectors: &'a [SparseVector],
}

#[derive(Deserialize)]
struct Payload {
    vectorizer: TfidfVectorizer,
    records: Vec<RouteRecord>,
    vectors: Vec<SparseVector>,
}

fn checksum_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".blake3");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Serialize `value` to `path` and write a `.blake3` sidecar. Returns the checksum.
pub fn write_json_checked<T: Serialize>(path: &Path, value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    let checksum = blake3::hash(&bytes).to_hex().to_string();
    write_atomic(path, &bytes)?;
    write_atomic(&checksum_path(path), checksum.as_bytes())?;
    Ok(checksum)
}

fn read_json_verified<T: DeserializeOwned>(path: &Path, expected: &str) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if blake3::hash(&bytes).to_hex().as_str() != expected.trim() {
        return Err(Error::Operation(format!("checksum mismatch for {}", path.display())).into());
    }
    serde_json::from_slice(&bytes).with_context(|| format!("decoding {}", path.display()))
}

/// Read `path`, verify it against its `.blake3` sidecar, and deserialize.
pub fn read_json_checked<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let sidecar = checksum_path(path);
    let expected = fs::read_to_string(&sidecar).with_context(|| format!("reading {}", sidecar.display()))?;
    read_json_verified(path, &expected)
}

/// Read an attachment listed in `manifest`. Fails with `Operation` when the
/// file is not listed or its contents are not the ones the manifest recorded.
pub fn read_attachment<T: DeserializeOwned>(dir: &Path, manifest: &Manifest, name: &str) -> Result<T> {
    let expected = manifest
        .attachments
        .get(name)
        .ok_or_else(|| Error::Operation(format!("snapshot {} has no attachment {name}", manifest.model_id)))?;
    read_json_verified(&dir.join(name), expected)
}

pub fn read_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() { return Ok(None); }
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(serde_json::from_str(&text)?))
}

impl SimilarityIndex {
    pub fn save(&self, dir: &Path) -> Result<Manifest> {
        self.save_with(dir, BTreeMap::new())
    }

    /// Save the index and record `attachments` (file name to checksum, as
    /// returned by [`write_json_checked`]) in the manifest.
    pub fn save_with(&self, dir: &Path, attachments: BTreeMap<String, String>) -> Result<Manifest> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let payload = PayloadRef { vectorizer: &self.vectorizer, records: &self.records, vectors: &self.vectors };
        let checksum = write_json_checked(&dir.join(INDEX_FILE), &payload)?;
        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            model_id: self.vectorizer.model_id().to_string(),
            built_at: Utc::now(),
            records: self.records.len(),
            vocabulary: self.vectorizer.dim(),
            checksum,
            attachments,
        };
        write_atomic(&dir.join(MANIFEST_FILE), &serde_json::to_vec_pretty(&manifest)?)?;
        tracing::info!(dir = %dir.display(), model_id = %manifest.model_id, records = manifest.records, "saved index snapshot");
        Ok(manifest)
    }

    /// Load a snapshot written by [`SimilarityIndex::save`]. A directory without
    /// a manifest yields [`Error::UnknownModel`].
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_with_manifest(dir).map(|(index, _)| index)
    }

    /// Like [`SimilarityIndex::load`], also returning the manifest the index was verified against.
    pub fn load_with_manifest(dir: &Path) -> Result<(Self, Manifest)> {
        let manifest = read_manifest(dir)?
            .ok_or_else(|| Error::UnknownModel(format!("no index snapshot in {}", dir.display())))?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(Error::Operation(format!(
                "unsupported snapshot format {} (expected {})",
                manifest.format_version, FORMAT_VERSION
            )).into());
        }
        let index_path = dir.join(INDEX_FILE);
        let sidecar = checksum_path(&index_path);
        let recorded = fs::read_to_string(&sidecar).with_context(|| format!("reading {}", sidecar.display()))?;
        if recorded.trim() != manifest.checksum {
            return Err(Error::Operation(format!("{} does not belong to manifest {}", INDEX_FILE, manifest.model_id)).into());
        }
        let payload: Payload = read_json_verified(&index_path, &manifest.checksum)?;
        if payload.vectorizer.model_id() != manifest.model_id {
            return Err(Error::Operation(format!(
                "manifest model {} does not match payload model {}",
                manifest.model_id, payload.vectorizer.model_id()
            )).into());
        }
        let index = SimilarityIndex::from_parts(payload.vectorizer, payload.records, payload.vectors)?;
        tracing::info!(dir = %dir.display(), model_id = %manifest.model_id, built_at = %manifest.built_at, records = index.len(), "loaded index snapshot");
        Ok((index, manifest))
    }
}
