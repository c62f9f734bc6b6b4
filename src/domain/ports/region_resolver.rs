//! Region Resolver Port
//!
//! Defines the interface for resolving proxy hosts to countries.

use crate::domain::entities::Region;

/// Why a host could not be resolved to a region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("no region found for {0}")]
    NotFound(String),
    #[error("region database error: {0}")]
    Database(String),
    #[error("region database unavailable")]
    Unavailable,
}

/// Resolver for a host address to its country.
///
/// This is an outbound port shared by every request, so implementations
/// must be safe for concurrent use without external locking.
pub trait RegionResolver: Send + Sync {
    fn search(&self, host: &str) -> Result<Region, LookupError>;
}
