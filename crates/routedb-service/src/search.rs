use regex::{Regex, RegexBuilder};

use routedb_core::error::{Error, Result};
use routedb_core::types::{Airport, AirportId, RouteRecord};

use crate::analytics::check_limit;
use crate::catalog::Catalog;

pub const DEFAULT_AIRPORT_LIMIT: usize = 20;
pub const MAX_AIRPORT_LIMIT: usize = 100;
pub const DEFAULT_ROUTE_LIMIT: usize = 50;
pub const MAX_ROUTE_LIMIT: usize = 200;

/// Case-insensitive pattern; anything that does not compile as a regex is matched literally.
fn airport_pattern(q: &str) -> Result<Regex> {
    let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();
    build(q)
        .or_else(|_| build(&regex::escape(q)))
        .map_err(|e| Error::InvalidQuery(format!("unusable search pattern: {e}")))
}

impl Catalog {
    /// Airports whose name, city, IATA code or country matches `q`, in catalog order.
    pub fn search_airports(&self, q: &str, limit: usize) -> Result<Vec<Airport>> {
        if q.is_empty() { return Err(Error::InvalidQuery("search query must not be empty".to_string())); }
        let limit = check_limit(limit, MAX_AIRPORT_LIMIT)?;
        let re = airport_pattern(q)?;
        Ok(self
            .airports
            .iter()
            .filter(|a| {
                re.is_match(&a.name) || re.is_match(&a.city) || re.is_match(&a.country)
                    || a.iata.as_deref().is_some_and(|code| re.is_match(code))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    /// Routes departing from or arriving at `airport_id`, in corpus order. Unknown ids give an empty list.
    pub fn routes_for_airport(&self, airport_id: AirportId, limit: usize) -> Result<Vec<RouteRecord>> {
        let limit = check_limit(limit, MAX_ROUTE_LIMIT)?;
        Ok(self
            .routes()
            .iter()
            .filter(|r| r.source_id == airport_id || r.dest_id == airport_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_regex_falls_back_to_literal() {
        let re = airport_pattern("(jfk").unwrap();
        assert!(re.is_match("terminal (JFK)"));
        assert!(!re.is_match("JFK"));
    }

    #[test]
    fn pattern_ignores_case() {
        assert!(airport_pattern("^los").unwrap().is_match("Los Angeles"));
    }
}
