use crate::error::Result;
use crate::types::{Neighbor, RouteRecord, SparseVector};

/// A fitted, immutable text → sparse vector model.
pub trait RouteVectorizer: Send + Sync {
    /// Stable identifier for the fitted model (vocabulary + weights).
    fn model_id(&self) -> &str;
    /// Number of vocabulary columns.
    fn dim(&self) -> usize;
    fn transform(&self, text: &str) -> SparseVector;
}

/// Predicate used to drop candidate routes from a nearest-neighbour scan.
pub type ExcludeFn<'a> = &'a (dyn Fn(&RouteRecord) -> bool + Sync);

pub trait SimilaritySearch: Send + Sync {
    type Vectorizer: RouteVectorizer;

    fn vectorizer(&self) -> &Self::Vectorizer;
    fn records(&self) -> &[RouteRecord];
    fn nearest_to(&self, query: &SparseVector, exclude: Option<ExcludeFn<'_>>, top_k: usize) -> Result<Vec<Neighbor>>;
}
