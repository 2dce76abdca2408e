//! TF-IDF over `char_wb` n-grams.
//!
//! Weighting follows the usual smoothed form:
//! `w(t, d) = tf(t, d) * (ln((1 + n) / (1 + df(t))) + 1)`, then each vector is
//! L2-normalized. Vocabulary columns are assigned in lexicographic n-gram order
//! and the vocabulary is closed after `fit`: unseen n-grams are ignored.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hasher;
use twox_hash::XxHash64;

use routedb_core::error::{Error, Result};
use routedb_core::traits::RouteVectorizer;
use routedb_core::types::{SparseVector, VectorizerConfig};

use crate::analyzer::char_wb_ngrams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, u32>,
    idf: Vec<f32>,
    n_docs: usize,
    model_id: String,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(texts: &[S], config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        if texts.is_empty() { return Err(Error::EmptyCorpus); }

        let mut df: HashMap<String, usize> = HashMap::new();
        let mut tf_total: HashMap<String, usize> = HashMap::new();
        for text in texts {
            let grams = char_wb_ngrams(text.as_ref(), config.min_n, config.max_n);
            let mut seen: HashSet<&str> = HashSet::with_capacity(grams.len());
            for g in &grams {
                *tf_total.entry(g.clone()).or_insert(0) += 1;
                if seen.insert(g.as_str()) { *df.entry(g.clone()).or_insert(0) += 1; }
            }
        }
        // blank texts only
        if df.is_empty() { return Err(Error::EmptyCorpus); }

        let mut terms: Vec<String> = df.keys().cloned().collect();
        if let Some(limit) = config.max_features {
            if terms.len() > limit {
                terms.sort_by(|a, b| tf_total[b].cmp(&tf_total[a]).then_with(|| a.cmp(b)));
                terms.truncate(limit);
            }
        }
        terms.sort();

        let n = texts.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(terms.len());
        for (col, term) in terms.into_iter().enumerate() {
            let d = df[&term] as f64;
            idf.push((((1.0 + n) / (1.0 + d)).ln() + 1.0) as f32);
            vocabulary.insert(term, col as u32);
        }
        let model_id = fingerprint(&config, &vocabulary, &idf);
        tracing::debug!(docs = texts.len(), vocabulary = vocabulary.len(), %model_id, "fitted tf-idf vectorizer");
        Ok(Self { config, vocabulary, idf, n_docs: texts.len(), model_id })
    }

    /// Fit, then vectorize every input with the fitted model. Output is index-aligned with `texts`.
    pub fn fit_transform<S: AsRef<str>>(texts: &[S], config: VectorizerConfig) -> Result<(Self, Vec<SparseVector>)> {
        let model = Self::fit(texts, config)?;
        let vectors = texts.iter().map(|t| model.transform(t.as_ref())).collect();
        Ok((model, vectors))
    }

    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for g in char_wb_ngrams(text, self.config.min_n, self.config.max_n) {
            if let Some(&col) = self.vocabulary.get(&g) { *counts.entry(col).or_insert(0) += 1; }
        }
        let pairs = counts.into_iter().map(|(col, c)| (col, c as f32 * self.idf[col as usize])).collect();
        SparseVector::from_pairs(pairs).l2_normalized()
    }

    pub fn config(&self) -> VectorizerConfig { self.config }

    pub fn n_docs(&self) -> usize { self.n_docs }

    /// Vocabulary in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        // BTreeMap iteration order is the column order
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn idf(&self, ngram: &str) -> Option<f32> {
        self.vocabulary.get(ngram).map(|&col| self.idf[col as usize])
    }

    /// Recompute the fingerprint and compare with the stored id (detects a tampered or stale model).
    pub fn verify(&self) -> Result<()> {
        let expected = fingerprint(&self.config, &self.vocabulary, &self.idf);
        if expected != self.model_id || self.idf.len() != self.vocabulary.len() {
            return Err(Error::Operation(format!("vectorizer fingerprint mismatch: stored {}, computed {}", self.model_id, expected)));
        }
        Ok(())
    }
}

impl RouteVectorizer for TfidfVectorizer {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.vocabulary.len() }
    fn transform(&self, text: &str) -> SparseVector { Self::transform(self, text) }
}

fn fingerprint(config: &VectorizerConfig, vocabulary: &BTreeMap<String, u32>, idf: &[f32]) -> String {
    let mut hasher = XxHash64::with_seed(0);
    for (term, &col) in vocabulary {
        hasher.write(term.as_bytes());
        hasher.write_u8(0);
        hasher.write_u32(idf.get(col as usize).map_or(0, |w| w.to_bits()));
    }
    format!("tfidf:char_wb:{}-{}:v{}:{:016x}", config.min_n, config.max_n, vocabulary.len(), hasher.finish())
}
