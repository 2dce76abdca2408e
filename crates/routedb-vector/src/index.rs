use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

use routedb_core::error::{Error, Result};
use routedb_core::traits::RouteVectorizer;
use routedb_core::types::{RouteRecord, SparseVector, VectorizerConfig};
use routedb_text::TfidfVectorizer;

/// Fitted vectorizer plus index-aligned `records`, `vectors` and their norms.
///
/// Built once and never mutated; a re-ingestion builds a new index.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    pub(crate) vectorizer: TfidfVectorizer,
    pub(crate) records: Vec<RouteRecord>,
    pub(crate) vectors: Vec<SparseVector>,
    pub(crate) norms: Vec<f64>,
}

impl SimilarityIndex {
    /// Fit the vectorizer over every record's `route_text` and vectorize the corpus.
    pub fn build(records: Vec<RouteRecord>, config: VectorizerConfig) -> Result<Self> {
        if records.is_empty() { return Err(Error::EmptyCorpus); }
        let started = Instant::now();
        let texts: Vec<&str> = records.iter().map(|r| r.route_text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts, config)?;

        let pb = ProgressBar::new(texts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} routes ({percent}%)")
                .map(|s| s.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let mut vectors = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            vectors.push(vectorizer.transform(text));
            if i % 1024 == 0 { pb.set_position(i as u64); }
        }
        pb.finish_and_clear();

        tracing::info!(
            routes = records.len(),
            vocabulary = vectorizer.dim(),
            model_id = vectorizer.model_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built similarity index"
        );
        Ok(Self::assemble(vectorizer, records, vectors))
    }

    /// Reassemble an index from persisted parts. Lengths must line up and the
    /// vectorizer fingerprint must match its contents.
    pub fn from_parts(vectorizer: TfidfVectorizer, records: Vec<RouteRecord>, vectors: Vec<SparseVector>) -> Result<Self> {
        if records.is_empty() { return Err(Error::EmptyCorpus); }
        if records.len() != vectors.len() {
            return Err(Error::Operation(format!("{} records but {} vectors", records.len(), vectors.len())));
        }
        vectorizer.verify()?;
        let dim = vectorizer.dim() as u32;
        if vectors.iter().any(|v| v.indices.iter().any(|&c| c >= dim) || v.indices.len() != v.values.len()) {
            return Err(Error::Operation("stored vector does not fit the vectorizer vocabulary".to_string()));
        }
        Ok(Self::assemble(vectorizer, records, vectors))
    }

    fn assemble(vectorizer: TfidfVectorizer, records: Vec<RouteRecord>, vectors: Vec<SparseVector>) -> Self {
        let norms = vectors.iter().map(SparseVector::norm).collect();
        Self { vectorizer, records, vectors, norms }
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn model_id(&self) -> &str { self.vectorizer.model_id() }

    pub fn vectors(&self) -> &[SparseVector] { &self.vectors }

    pub fn record(&self, index: usize) -> Option<&RouteRecord> { self.records.get(index) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: usize, carrier: &str, s: &str, d: &str) -> RouteRecord {
        RouteRecord {
            id, carrier_code: carrier.into(), airline_id: None,
            source_code: s.into(), source_id: 1, dest_code: d.into(), dest_id: 2,
            codeshare: None, stops: 0, equipment: None, route_text: format!("{s}-{d}"),
        }
    }

    #[test]
    fn build_rejects_empty_corpus() {
        assert!(matches!(SimilarityIndex::build(vec![], VectorizerConfig::default()), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn build_keeps_duplicates_index_aligned() {
        let idx = SimilarityIndex::build(
            vec![route(1, "AA", "JFK", "LAX"), route(2, "XX", "JFK", "LAX")],
            VectorizerConfig::default(),
        ).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.vectors()[0], idx.vectors()[1]);
        assert_eq!(idx.record(1).map(|r| r.carrier_code.as_str()), Some("XX"));
    }

    #[test]
    fn from_parts_rejects_misaligned_vectors() {
        let idx = SimilarityIndex::build(vec![route(1, "AA", "JFK", "LAX")], VectorizerConfig::default()).unwrap();
        let err = SimilarityIndex::from_parts(idx.vectorizer.clone(), idx.records.clone(), vec![]).unwrap_err();
        assert!(matches!(err, Error::Operation(_)));
    }
}
