use routedb_core::data_processor::route_text;
use routedb_core::error::{Error, Result};
use routedb_core::traits::{RouteVectorizer, SimilaritySearch};
use routedb_core::types::{RouteRecord, SimilarityResult};
use routedb_vector::SimilarityIndex;

/// Route recommendations and direct lookups over a built index.
///
/// Queries are vectorized with the index's own fitted model; nothing is refit
/// per request.
#[derive(Debug, Clone)]
pub struct QueryService<S = SimilarityIndex> where S: SimilaritySearch {
    index: S,
}

impl<S> QueryService<S> where S: SimilaritySearch {
    pub fn new(index: S) -> Self { Self { index } }

    pub fn index(&self) -> &S { &self.index }

    pub fn records(&self) -> &[RouteRecord] { self.index.records() }

    pub fn len(&self) -> usize { self.index.records().len() }

    pub fn is_empty(&self) -> bool { self.index.records().is_empty() }

    pub fn model_id(&self) -> &str { self.index.vectorizer().model_id() }

    /// Up to `top_k` stored routes most similar to `source-dest`, best first.
    ///
    /// The query route itself is included when it exists (similarity 1.0).
    /// Routes sharing no n-gram with the query are left out, so an unrelated
    /// pair yields an empty list rather than an error.
    pub fn recommend(&self, source: &str, dest: &str, top_k: usize) -> Result<Vec<SimilarityResult>> {
        let source = normalize_code("source", source)?;
        let dest = normalize_code("destination", dest)?;
        if top_k == 0 { return Err(Error::InvalidQuery("top_k must be a positive integer".to_string())); }

        let query = self.index.vectorizer().transform(&route_text(&source, &dest));
        let records = self.index.records();
        let results: Vec<SimilarityResult> = self
            .index
            .nearest_to(&query, None, top_k)?
            .into_iter()
            .filter(|hit| hit.score > 0.0)
            .filter_map(|hit| {
                records.get(hit.index).map(|r| SimilarityResult {
                    source_code: r.source_code.clone(),
                    dest_code: r.dest_code.clone(),
                    carrier_code: r.carrier_code.clone(),
                    similarity_score: hit.score,
                })
            })
            .collect();
        tracing::debug!(%source, %dest, top_k, results = results.len(), "recommend");
        Ok(results)
    }

    /// Every stored record flying exactly `source -> dest`, all carriers, in corpus order.
    pub fn direct_routes(&self, source: &str, dest: &str) -> Result<Vec<RouteRecord>> {
        let source = normalize_code("source", source)?;
        let dest = normalize_code("destination", dest)?;
        Ok(self
            .index
            .records()
            .iter()
            .filter(|r| r.source_code.eq_ignore_ascii_case(&source) && r.dest_code.eq_ignore_ascii_case(&dest))
            .cloned()
            .collect())
    }
}

/// Validate a 3-letter IATA code and return it uppercased.
pub fn normalize_code(field: &str, code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::InvalidQuery(format!("{field} must be a 3-letter IATA code, got {code:?}")));
    }
    Ok(code.to_ascii_uppercase())
}
