//! Domain Entities - Core business objects
//!
//! These entities represent the records served by the query API.
//! They have no external dependencies beyond serde.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A proxy endpoint held in the pool.
///
/// The pool owns and mutates proxies; the API only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proxy {
    /// Network address (IPv4, IPv6 or hostname)
    pub host: String,
    /// Port the proxy listens on
    pub port: u16,
}

impl Proxy {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Canonical `host:port` form returned by `/random` and `/all`.
impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Geographic region resolved for a proxy host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Country name in the resolver's configured locale
    pub country: String,
}

impl Region {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }
}
