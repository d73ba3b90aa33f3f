//! The invariant query parameters sent with every history request.

use std::fmt;
use std::fmt::{Display, Formatter};

/// Query keys the scraper fills in from the date being requested.
pub const DATE_KEYS: [&str; 3] = ["year", "month", "day"];

/// Ordered set of query parameters that stay the same for a whole scrape run.
///
/// Keys are unique: inserting an existing key replaces its value in place, so the
/// original ordering is kept. The date keys (`year`, `month`, `day`) may be present
/// but are always overridden by [`crate::build_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for a Weather Underground personal weather station history page.
    ///
    /// * `station_id` - station identifier, sent as `ID`
    /// * `graphspan` - aggregation of the returned data, `day` gives the finest resolution
    /// * `format` - output format code, `1` yields comma separated text
    pub fn wunderground(station_id: &str, graphspan: &str, format: u32) -> Self {
        Self::new()
            .with("ID", station_id)
            .with("graphspan", graphspan)
            .with("format", format)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs that are not overridden by the request date.
    pub fn invariant_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !DATE_KEYS.contains(k))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let params = QueryParams::new()
            .with("ID", "KCASANFR58")
            .with("graphspan", "day")
            .with("ID", "KNYNEWYO12");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("ID"), Some("KNYNEWYO12"));
        assert_eq!(params.iter().next(), Some(("ID", "KNYNEWYO12")));
    }

    #[test]
    fn test_invariant_pairs_skip_date_keys() {
        let params = QueryParams::wunderground("KCASANFR58", "day", 1)
            .with("year", 1999)
            .with("day", 4);
        let keys: Vec<_> = params.invariant_pairs().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ID", "graphspan", "format"]);
    }

    #[test]
    fn test_display() {
        let params = QueryParams::wunderground("X", "day", 1);
        assert_eq!(params.to_string(), "ID=X, graphspan=day, format=1");
    }
}
