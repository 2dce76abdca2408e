use std::collections::HashMap;

use routedb_core::types::{Airline, AirlineId, Airport, AirportId, RouteRecord};
use routedb_vector::SimilarityIndex;

use crate::recommend::QueryService;

/// One ingested snapshot: reference tables plus the route index built from them.
///
/// Never mutated once built; re-ingestion produces a new catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub airports: Vec<Airport>,
    pub airlines: Vec<Airline>,
    pub service: QueryService,
    airport_by_id: HashMap<AirportId, usize>,
    airline_by_id: HashMap<AirlineId, usize>,
}

impl Catalog {
    pub fn new(airports: Vec<Airport>, airlines: Vec<Airline>, index: SimilarityIndex) -> Self {
        // first row wins on duplicate ids
        let mut airport_by_id = HashMap::with_capacity(airports.len());
        for (i, a) in airports.iter().enumerate() { airport_by_id.entry(a.id).or_insert(i); }
        let mut airline_by_id = HashMap::with_capacity(airlines.len());
        for (i, a) in airlines.iter().enumerate() { airline_by_id.entry(a.id).or_insert(i); }
        Self { airports, airlines, service: QueryService::new(index), airport_by_id, airline_by_id }
    }

    pub fn airport(&self, id: AirportId) -> Option<&Airport> {
        self.airport_by_id.get(&id).map(|&i| &self.airports[i])
    }

    pub fn airline(&self, id: AirlineId) -> Option<&Airline> {
        self.airline_by_id.get(&id).map(|&i| &self.airlines[i])
    }

    pub fn routes(&self) -> &[RouteRecord] { self.service.records() }

    pub fn model_id(&self) -> &str { self.service.model_id() }
}
