//! Domain types shared by the vectorizer, the similarity index and the query service.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type AirportId = i64;
pub type AirlineId = i64;

/// One airport row from `airports.dat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One airline row from `airlines.dat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub id: AirlineId,
    pub name: String,
    pub alias: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub callsign: Option<String>,
    pub country: Option<String>,
    pub active: bool,
}

/// A single observed (source, destination, carrier) route.
///
/// - `id`: 1-based position in the ingested corpus
/// - `carrier_code`/`source_code`/`dest_code`: codes as found in `routes.dat`
/// - `route_text`: `"{SOURCE}-{DEST}"`, the text the vectorizer sees
///
/// Duplicated triples are kept as separate records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: usize,
    #[serde(rename = "airline")]
    pub carrier_code: String,
    pub airline_id: Option<AirlineId>,
    #[serde(rename = "source")]
    pub source_code: String,
    pub source_id: AirportId,
    #[serde(rename = "dest")]
    pub dest_code: String,
    pub dest_id: AirportId,
    pub codeshare: Option<String>,
    pub stops: u32,
    pub equipment: Option<String>,
    pub route_text: String,
}

/// Everything loaded from one OpenFlights data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub airports: Vec<Airport>,
    pub airlines: Vec<Airline>,
    pub routes: Vec<RouteRecord>,
}

/// Sparse vector as parallel `indices`/`values`, indices strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Build from unsorted `(column, weight)` pairs; repeated columns are summed.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_by_key(|(i, _)| *i);
        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            match indices.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = values.last_mut() { *acc += v; }
                }
                _ => { indices.push(i); values.push(v); }
            }
        }
        Self { indices, values }
    }

    pub fn nnz(&self) -> usize { self.indices.len() }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|&v| f64::from(v) * f64::from(v)).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (0usize, 0usize);
        let mut acc = 0f64;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    acc += f64::from(self.values[a]) * f64::from(other.values[b]);
                    a += 1;
                    b += 1;
                }
            }
        }
        acc
    }

    /// Scale to unit length. The zero vector is returned unchanged.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values { *v = (f64::from(*v) / norm) as f32; }
        }
        self
    }
}

/// Vectorizer parameters: character n-gram range and optional vocabulary cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub min_n: usize,
    pub max_n: usize,
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self { Self { min_n: 2, max_n: 5, max_features: None } }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(Error::InvalidConfig(format!(
                "n-gram range must satisfy 1 <= min_n <= max_n (got {}..={})",
                self.min_n, self.max_n
            )));
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidConfig("max_features must be positive".to_string()));
        }
        Ok(())
    }
}

/// Position of a stored route and its cosine similarity to a query.
///
/// `index` is the record's position in the index, not its `id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub score: f32,
}

/// One ranked recommendation as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    #[serde(rename = "source")]
    pub source_code: String,
    #[serde(rename = "dest")]
    pub dest_code: String,
    #[serde(rename = "airline")]
    pub carrier_code: String,
    #[serde(rename = "similarity")]
    pub similarity_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0), (3, 0.5)]);
        assert_eq!(v.indices, vec![1, 3]);
        assert_eq!(v.values, vec![2.0, 1.5]);
    }

    #[test]
    fn dot_only_counts_shared_columns() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (2, 2.0), (5, 1.0)]);
        let b = SparseVector::from_pairs(vec![(2, 3.0), (4, 7.0), (5, 2.0)]);
        assert!((a.dot(&b) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_stays_zero_when_normalized() {
        let v = SparseVector::default().l2_normalized();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn vectorizer_config_rejects_bad_range() {
        assert!(VectorizerConfig { min_n: 3, max_n: 2, max_features: None }.validate().is_err());
        assert!(VectorizerConfig { min_n: 0, max_n: 2, max_features: None }.validate().is_err());
        assert!(VectorizerConfig { max_features: Some(0), ..Default::default() }.validate().is_err());
        assert!(VectorizerConfig::default().validate().is_ok());
    }
}
