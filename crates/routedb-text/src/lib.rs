//! routedb-text
//!
//! Character n-gram analysis and the TF-IDF vectorizer used to embed route
//! texts. The vectorizer is fit once over the whole route corpus and then only
//! used to transform; see `vectorizer` for the weighting scheme.

pub mod analyzer;
pub mod vectorizer;

pub use analyzer::char_wb_ngrams;
pub use vectorizer::TfidfVectorizer;
