//! Brute-force cosine ranking.
//!
//! Every query scans all stored vectors. At OpenFlights scale (~67k routes)
//! a sparse dot product per route is a few milliseconds, so no approximate
//! index is kept.

use routedb_core::error::{Error, Result};
use routedb_core::traits::{ExcludeFn, SimilaritySearch};
use routedb_core::types::{Neighbor, RouteRecord, SparseVector};
use routedb_text::TfidfVectorizer;

use crate::index::SimilarityIndex;

/// `q·v / (|q| |v|)`, `0` when either norm is zero, clamped to `[0, 1]`.
pub fn cosine(query: &SparseVector, query_norm: f64, stored: &SparseVector, stored_norm: f64) -> f32 {
    if query_norm == 0.0 || stored_norm == 0.0 { return 0.0; }
    (query.dot(stored) / (query_norm * stored_norm)).clamp(0.0, 1.0) as f32
}

impl SimilarityIndex {
    /// Rank stored routes by cosine similarity to `query`.
    ///
    /// Returns at most `top_k` neighbours (all of them if `top_k` exceeds the
    /// corpus), highest score first, equal scores in insertion order.
    pub fn nearest_to(&self, query: &SparseVector, exclude: Option<ExcludeFn<'_>>, top_k: usize) -> Result<Vec<Neighbor>> {
        if top_k == 0 { return Err(Error::InvalidQuery("top_k must be a positive integer".to_string())); }
        let query_norm = query.norm();
        let mut hits: Vec<Neighbor> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .filter(|(i, _)| exclude.map_or(true, |skip| !skip(&self.records[*i])))
            .map(|(index, (v, &n))| Neighbor { index, score: cosine(query, query_norm, v, n) })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
        hits.truncate(top_k);
        Ok(hits)
    }

    /// Vectorize `text` with the fitted model and rank against it.
    pub fn nearest_to_text(&self, text: &str, top_k: usize) -> Result<Vec<Neighbor>> {
        let q = self.vectorizer.transform(text);
        self.nearest_to(&q, None, top_k)
    }
}

impl SimilaritySearch for SimilarityIndex {
    type Vectorizer = TfidfVectorizer;

    fn vectorizer(&self) -> &TfidfVectorizer { &self.vectorizer }
    fn records(&self) -> &[RouteRecord] { &self.records }
    fn nearest_to(&self, query: &SparseVector, exclude: Option<ExcludeFn<'_>>, top_k: usize) -> Result<Vec<Neighbor>> {
        Self::nearest_to(self, query, exclude, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        let v = SparseVector::from_pairs(vec![(0, 1.0)]);
        assert_eq!(cosine(&SparseVector::default(), 0.0, &v, 1.0), 0.0);
        assert_eq!(cosine(&v, 1.0, &SparseVector::default(), 0.0), 0.0);
    }

    #[test]
    fn cosine_is_scale_invariant() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)]);
        let b = SparseVector::from_pairs(vec![(0, 3.0), (1, 3.0)]);
        assert!((cosine(&a, a.norm(), &b, b.norm()) - 1.0).abs() < 1e-6);
    }
}
