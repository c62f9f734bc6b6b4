//! Region Report Service
//!
//! Groups a snapshot of the pool by the country each proxy resolves to.
//! A failed lookup only moves that one proxy into the `Unknown` bucket.

use crate::domain::entities::Proxy;
use crate::domain::ports::RegionResolver;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Bucket for proxies whose region could not be resolved.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Country counts ordered by count descending, then country name ascending.
///
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCounts {
    entries: Vec<(String, usize)>,
}

impl RegionCounts {
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn get(&self, country: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(c, _)| c == country)
            .map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RegionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (country, count) in &self.entries {
            map.serialize_entry(country, count)?;
        }
        map.end()
    }
}

/// Count proxies per country.
///
/// The snapshot is walked once in store order. Equal counts are ordered
/// by country name so the report is reproducible.
pub fn count_by_region(proxies: &[Proxy], resolver: &dyn RegionResolver) -> RegionCounts {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for proxy in proxies {
        let country = match resolver.search(&proxy.host) {
            Ok(region) => region.country,
            Err(_) => UNKNOWN_COUNTRY.to_string(),
        };
        *counts.entry(country).or_insert(0) += 1;
    }

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|(a_country, a_count), (b_country, b_count)| {
        (Reverse(a_count), a_country).cmp(&(Reverse(b_count), b_country))
    });

    RegionCounts { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Region;
    use crate::domain::ports::LookupError;

    /// Resolves by looking the host up in a fixed table.
    struct TableResolver(HashMap<&'static str, &'static str>);

    impl RegionResolver for TableResolver {
        fn search(&self, host: &str) -> Result<Region, LookupError> {
            self.0
                .get(host)
                .map(|c| Region::new(*c))
                .ok_or_else(|| LookupError::NotFound(host.to_string()))
        }
    }

    struct FailingResolver;

    impl RegionResolver for FailingResolver {
        fn search(&self, host: &str) -> Result<Region, LookupError> {
            Err(LookupError::InvalidAddress(host.to_string()))
        }
    }

    fn proxies(hosts: &[&str]) -> Vec<Proxy> {
        hosts
            .iter()
            .enumerate()
            .map(|(i, h)| Proxy::new(*h, 8000 + i as u16))
            .collect()
    }

    #[test]
    fn test_empty_snapshot() {
        let counts = count_by_region(&[], &FailingResolver);
        assert!(counts.is_empty());
        assert_eq!(serde_json::to_string(&counts).unwrap(), "{}");
    }

    #[test]
    fn test_resolver_always_failing() {
        let pool = proxies(&["a", "b", "c", "d"]);
        let counts = count_by_region(&pool, &FailingResolver);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(UNKNOWN_COUNTRY), Some(4));
    }

    #[test]
    fn test_orders_by_count_then_name() {
        let resolver = TableResolver(HashMap::from([
            ("a1", "A"),
            ("a2", "A"),
            ("a3", "A"),
            ("a4", "A"),
            ("a5", "A"),
            ("c1", "C"),
            ("c2", "C"),
            ("c3", "C"),
            ("b1", "B"),
            ("b2", "B"),
            ("b3", "B"),
        ]));
        let pool = proxies(&[
            "c1", "a1", "b1", "c2", "a2", "b2", "a3", "c3", "a4", "b3", "a5",
        ]);

        let counts = count_by_region(&pool, &resolver);
        let order: Vec<&str> = counts.entries().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(counts.get("A"), Some(5));
        assert_eq!(counts.get("B"), Some(3));
        assert_eq!(counts.get("C"), Some(3));
    }

    #[test]
    fn test_partial_failures_land_in_unknown() {
        let resolver = TableResolver(HashMap::from([("1.1.1.1", "Australia"), ("8.8.8.8", "United States")]));
        let pool = proxies(&["1.1.1.1", "8.8.8.8", "8.8.8.8", "not-an-ip", "10.0.0.1"]);

        let counts = count_by_region(&pool, &resolver);
        assert_eq!(counts.get("United States"), Some(2));
        assert_eq!(counts.get(UNKNOWN_COUNTRY), Some(2));
        assert_eq!(counts.get("Australia"), Some(1));
        assert_eq!(counts.total(), pool.len());
    }

    #[test]
    fn test_total_matches_snapshot_len() {
        let resolver = TableResolver(HashMap::from([("x", "X"), ("y", "Y")]));
        let pool = proxies(&["x", "y", "z", "x", "x", "q"]);
        let counts = count_by_region(&pool, &resolver);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_duplicate_proxies_are_counted() {
        let resolver = TableResolver(HashMap::from([("x", "X")]));
        let pool = vec![Proxy::new("x", 1), Proxy::new("x", 1)];
        let counts = count_by_region(&pool, &resolver);
        assert_eq!(counts.get("X"), Some(2));
    }

    #[test]
    fn test_serializes_in_report_order() {
        let resolver = TableResolver(HashMap::from([("z", "Zambia"), ("a", "Albania")]));
        let pool = proxies(&["a", "z", "z"]);
        let json = serde_json::to_string(&count_by_region(&pool, &resolver)).unwrap();
        assert_eq!(json, r#"{"Zambia":2,"Albania":1}"#);
    }

    #[test]
    fn test_serializes_non_ascii_country_names() {
        let resolver = TableResolver(HashMap::from([("h", "中国")]));
        let json = serde_json::to_string(&count_by_region(&proxies(&["h"]), &resolver)).unwrap();
        assert_eq!(json, r#"{"中国":1}"#);
    }
}
