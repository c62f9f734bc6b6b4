//! Proxy Store Port
//!
//! Defines the interface for reading the proxy pool.
//! Implementations may use SQLite, an in-memory pool, or any other store.

use crate::domain::entities::Proxy;
use async_trait::async_trait;
use std::sync::Arc;

/// Errors raised by a proxy store or while connecting to one.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("proxy pool is empty")]
    PoolEmpty,
    #[error("failed to connect to proxy store: {0}")]
    Connect(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("store task failed: {0}")]
    Task(String),
}

/// Read access to the proxy pool.
///
/// This is an outbound port. Request handlers call it without knowing
/// how the pool is persisted or how proxies are scored.
#[async_trait]
pub trait ProxyStore: Send + Sync {
    /// Pick one proxy at random. Selection policy belongs to the store.
    async fn random(&self) -> Result<Proxy, StoreError>;

    /// Snapshot of every proxy, in the store's own order.
    async fn all(&self) -> Result<Vec<Proxy>, StoreError>;

    /// Number of proxies currently in the pool.
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Factory for store handles.
///
/// Each inbound request asks for at most one handle; see
/// [`RequestContext`](crate::adapters::inbound::RequestContext).
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ProxyStore>, StoreError>;
}
