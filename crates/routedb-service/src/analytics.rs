//! Traffic aggregates over the ingested catalog.
//!
//! Every ranking sorts by count descending; equal counts keep ascending key
//! order so repeated calls return identical lists.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use routedb_core::error::{Error, Result};
use routedb_core::types::{AirlineId, AirportId};

use crate::catalog::Catalog;

pub const DEFAULT_RANKING_LIMIT: usize = 10;
pub const MAX_RANKING_LIMIT: usize = 50;
pub const DEFAULT_COUNTRY_LIMIT: usize = 20;
pub const MAX_COUNTRY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_airports: usize,
    pub total_airlines: usize,
    pub total_routes: usize,
    pub total_countries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportTraffic {
    pub airport_id: AirportId,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: Option<String>,
    pub routes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineTraffic {
    pub airline_id: AirlineId,
    pub name: String,
    pub iata: Option<String>,
    pub country: Option<String>,
    pub routes: usize,
}

/// Airport fields are `None` when the id has no airport row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularRoute {
    pub source: Option<String>,
    pub source_name: Option<String>,
    pub dest: Option<String>,
    pub dest_name: Option<String>,
    pub airlines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub airports: usize,
}

/// Reject `limit` outside `1..=max`.
pub fn check_limit(limit: usize, max: usize) -> Result<usize> {
    if limit == 0 || limit > max {
        return Err(Error::InvalidQuery(format!("limit must be between 1 and {max}, got {limit}")));
    }
    Ok(limit)
}

fn ranked<K: Ord, I: IntoIterator<Item = K>>(keys: I) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for k in keys { *counts.entry(k).or_insert(0) += 1; }
    let mut out: Vec<(K, usize)> = counts.into_iter().collect();
    // stable: ties stay in key order
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

impl Catalog {
    pub fn stats(&self) -> Stats {
        let countries: BTreeSet<&str> = self.airports.iter().map(|a| a.country.as_str()).filter(|c| !c.is_empty()).collect();
        Stats {
            total_airports: self.airports.len(),
            total_airlines: self.airlines.len(),
            total_routes: self.routes().len(),
            total_countries: countries.len(),
        }
    }

    /// Airports by number of inbound routes. Destination ids without an airport row are dropped
    /// after the limit is applied.
    pub fn busiest_airports(&self, limit: usize) -> Result<Vec<AirportTraffic>> {
        let limit = check_limit(limit, MAX_RANKING_LIMIT)?;
        Ok(ranked(self.routes().iter().map(|r| r.dest_id))
            .into_iter()
            .take(limit)
            .filter_map(|(id, routes)| {
                self.airport(id).map(|a| AirportTraffic {
                    airport_id: id,
                    name: a.name.clone(),
                    city: a.city.clone(),
                    country: a.country.clone(),
                    iata: a.iata.clone(),
                    routes,
                })
            })
            .collect())
    }

    /// Airlines by number of routes flown; routes without an airline id are not counted.
    pub fn top_airlines(&self, limit: usize) -> Result<Vec<AirlineTraffic>> {
        let limit = check_limit(limit, MAX_RANKING_LIMIT)?;
        Ok(ranked(self.routes().iter().filter_map(|r| r.airline_id))
            .into_iter()
            .take(limit)
            .filter_map(|(id, routes)| {
                self.airline(id).map(|a| AirlineTraffic {
                    airline_id: id,
                    name: a.name.clone(),
                    iata: a.iata.clone(),
                    country: a.country.clone(),
                    routes,
                })
            })
            .collect())
    }

    /// Airport pairs by number of carriers (route rows) serving them.
    pub fn popular_routes(&self, limit: usize) -> Result<Vec<PopularRoute>> {
        let limit = check_limit(limit, MAX_RANKING_LIMIT)?;
        Ok(ranked(self.routes().iter().map(|r| (r.source_id, r.dest_id)))
            .into_iter()
            .take(limit)
            .map(|((source_id, dest_id), airlines)| {
                let source = self.airport(source_id);
                let dest = self.airport(dest_id);
                PopularRoute {
                    source: source.and_then(|a| a.iata.clone()),
                    source_name: source.map(|a| a.name.clone()),
                    dest: dest.and_then(|a| a.iata.clone()),
                    dest_name: dest.map(|a| a.name.clone()),
                    airlines,
                }
            })
            .collect())
    }

    pub fn airports_by_country(&self, limit: usize) -> Result<Vec<CountryCount>> {
        let limit = check_limit(limit, MAX_COUNTRY_LIMIT)?;
        Ok(ranked(self.airports.iter().map(|a| a.country.as_str()).filter(|c| !c.is_empty()))
            .into_iter()
            .take(limit)
            .map(|(country, airports)| CountryCount { country: country.to_string(), airports })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_bounded() {
        assert!(matches!(check_limit(0, 50), Err(Error::InvalidQuery(_))));
        assert!(matches!(check_limit(51, 50), Err(Error::InvalidQuery(_))));
        assert_eq!(check_limit(50, 50).unwrap(), 50);
    }

    #[test]
    fn ranking_breaks_ties_by_key() {
        let r = ranked(vec![3, 1, 2, 3, 1]);
        assert_eq!(r, vec![(1, 2), (3, 2), (2, 1)]);
    }
}
