//! Per-request store connection cache.
//!
//! Every inbound request gets its own [`RequestContext`]. The first call
//! to [`RequestContext::connection`] opens a store handle through the
//! configured connector; later calls in the same request reuse it. The
//! handle is dropped with the context when the request ends.

use super::api_server::ApiState;
use crate::domain::ports::{ProxyStore, StoreConnector, StoreError};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct RequestContext {
    connector: Arc<dyn StoreConnector>,
    conn: OnceCell<Arc<dyn ProxyStore>>,
}

impl RequestContext {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            conn: OnceCell::new(),
        }
    }

    /// Store handle for this request, connecting on first use.
    ///
    /// A failed connect leaves the cache empty and is returned as-is;
    /// nothing is retried.
    pub async fn connection(&self) -> Result<Arc<dyn ProxyStore>, StoreError> {
        self.conn
            .get_or_try_init(|| self.connector.connect())
            .await
            .cloned()
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.conn.initialized()
    }
}

#[async_trait]
impl FromRequestParts<ApiState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new(state.connector.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::MemoryProxyStore;
    use crate::domain::entities::Proxy;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Connector that counts how many handles it has built.
    struct CountingConnector {
        connects: AtomicUsize,
        store: Arc<MemoryProxyStore>,
    }

    impl CountingConnector {
        fn new() -> Self {
            Self {
                connects: AtomicUsize::new(0),
                store: Arc::new(MemoryProxyStore::with_proxies([Proxy::new("1.2.3.4", 80)])),
            }
        }
    }

    #[async_trait]
    impl StoreConnector for CountingConnector {
        async fn connect(&self) -> Result<Arc<dyn ProxyStore>, StoreError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(self.store.clone() as Arc<dyn ProxyStore>)
        }
    }

    struct FailingConnector {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl StoreConnector for FailingConnector {
        async fn connect(&self) -> Result<Arc<dyn ProxyStore>, StoreError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Connect("refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_connects_lazily() {
        let connector = Arc::new(CountingConnector::new());
        let ctx = RequestContext::new(connector.clone());

        assert!(!ctx.is_connected());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connects_once_per_request() {
        let connector = Arc::new(CountingConnector::new());
        let ctx = RequestContext::new(connector.clone());

        let first = ctx.connection().await.unwrap();
        let second = ctx.connection().await.unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(ctx.is_connected());
    }

    #[tokio::test]
    async fn test_new_request_gets_new_handle() {
        let connector = Arc::new(CountingConnector::new());

        let ctx_a = RequestContext::new(connector.clone());
        ctx_a.connection().await.unwrap();
        let ctx_b = RequestContext::new(connector.clone());
        ctx_b.connection().await.unwrap();
        ctx_b.connection().await.unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_failure_propagates() {
        let connector = Arc::new(FailingConnector {
            attempts: AtomicUsize::new(0),
        });
        let ctx = RequestContext::new(connector.clone());

        assert!(matches!(ctx.connection().await, Err(StoreError::Connect(_))));
        assert!(!ctx.is_connected());
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }
}
