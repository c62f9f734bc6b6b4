//! MaxMind Region Resolver
//!
//! Implements RegionResolver using a MaxMind GeoLite2/GeoIP2 country database.

use crate::domain::entities::Region;
use crate::domain::ports::{LookupError, RegionResolver};
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

/// MaxMind region resolver.
///
/// Loaded once at startup and shared by every request. The reader is
/// immutable after loading, so concurrent lookups need no locking.
pub struct MaxMindRegionResolver {
    reader: Arc<Reader<Vec<u8>>>,
    locale: String,
}

impl MaxMindRegionResolver {
    /// Load a GeoIP database from a file path.
    ///
    /// `locale` picks the country-name language (`en`, `zh-CN`, ...);
    /// lookups fall back to the ISO code when that name is missing.
    pub fn from_file(path: &str, locale: &str) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
            locale: locale.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct Country {
    iso_code: Option<String>,
    names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct CountryRecord {
    country: Option<Country>,
}

fn parse_host(host: &str) -> Result<IpAddr, LookupError> {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .map_err(|_| LookupError::InvalidAddress(host.to_string()))
}

fn lookup_error(host: &str, err: MaxMindDBError) -> LookupError {
    match err {
        MaxMindDBError::AddressNotFoundError(_) => LookupError::NotFound(host.to_string()),
        other => LookupError::Database(other.to_string()),
    }
}

/// Country name in `locale`, else the ISO code.
fn country_name(country: Country, locale: &str) -> Option<String> {
    country
        .names
        .and_then(|mut names| names.remove(locale))
        .or(country.iso_code)
}

fn region_from_record(
    record: CountryRecord,
    host: &str,
    locale: &str,
) -> Result<Region, LookupError> {
    record
        .country
        .and_then(|country| country_name(country, locale))
        .map(Region::new)
        .ok_or_else(|| LookupError::NotFound(host.to_string()))
}

impl RegionResolver for MaxMindRegionResolver {
    fn search(&self, host: &str) -> Result<Region, LookupError> {
        let ip = parse_host(host)?;
        let record: CountryRecord = self
            .reader
            .lookup(ip)
            .map_err(|e| lookup_error(host, e))?;
        region_from_record(record, host, &self.locale)
    }
}

/// Resolver used when no region database could be loaded.
///
/// Every lookup fails, so `/count_by_region` reports the whole pool
/// under `Unknown` instead of refusing to answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRegionResolver;

impl RegionResolver for NullRegionResolver {
    fn search(&self, _host: &str) -> Result<Region, LookupError> {
        Err(LookupError::Unavailable)
    }
}
