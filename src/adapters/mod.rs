//! Adapters Layer
//!
//! Inbound: the HTTP query API. Outbound: proxy stores and region resolvers.

pub mod inbound;
pub mod outbound;
