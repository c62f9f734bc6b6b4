//! Proxy Pool API Library
//!
//! Read-only HTTP query surface over a proxy pool, exposed as a library
//! for the binary and for integration tests.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{router, ApiError, ApiServer, ApiState, RequestContext};
pub use config::load_config;
pub use domain::entities::{Proxy, Region};
pub use domain::ports::{LookupError, ProxyStore, RegionResolver, StoreConnector, StoreError};
pub use domain::services::{count_by_region, RegionCounts};
pub use domain::value_objects::ScoreRange;
