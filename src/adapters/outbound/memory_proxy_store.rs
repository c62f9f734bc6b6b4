//! In-Memory Proxy Store
//!
//! Implements ProxyStore over a scored list held in process memory.
//! Used when no database path is configured and throughout the tests.

use crate::domain::entities::Proxy;
use crate::domain::ports::{ProxyStore, StoreConnector, StoreError};
use crate::domain::value_objects::ScoreRange;
use async_trait::async_trait;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// In-memory proxy pool.
///
/// Proxies keep their insertion order; `all()` orders by score
/// ascending with insertion order breaking ties.
pub struct MemoryProxyStore {
    proxies: RwLock<Vec<(Proxy, i64)>>,
    scores: ScoreRange,
}

impl MemoryProxyStore {
    pub fn new(scores: ScoreRange) -> Self {
        Self {
            proxies: RwLock::new(Vec::new()),
            scores,
        }
    }

    /// Build a pool where every proxy has the maximum score.
    pub fn with_proxies(proxies: impl IntoIterator<Item = Proxy>) -> Self {
        let store = Self::new(ScoreRange::default());
        for proxy in proxies {
            store.add(proxy, store.scores.max);
        }
        store
    }

    /// Insert a proxy, or update its score if already present.
    pub fn add(&self, proxy: Proxy, score: i64) {
        let mut guard = self.proxies.write();
        match guard.iter().position(|(p, _)| *p == proxy) {
            Some(idx) => guard[idx].1 = score,
            None => guard.push((proxy, score)),
        }
    }
}

impl Default for MemoryProxyStore {
    fn default() -> Self {
        Self::new(ScoreRange::default())
    }
}

#[async_trait]
impl ProxyStore for MemoryProxyStore {
    async fn random(&self) -> Result<Proxy, StoreError> {
        let guard = self.proxies.read();
        let mut rng = rand::thread_rng();

        let best: Vec<&Proxy> = guard
            .iter()
            .filter(|(_, s)| *s == self.scores.max)
            .map(|(p, _)| p)
            .collect();
        if let Some(proxy) = best.choose(&mut rng) {
            return Ok((*proxy).clone());
        }

        let in_range: Vec<&Proxy> = guard
            .iter()
            .filter(|(_, s)| self.scores.contains(*s))
            .map(|(p, _)| p)
            .collect();
        in_range
            .choose(&mut rng)
            .map(|p| (*p).clone())
            .ok_or(StoreError::PoolEmpty)
    }

    async fn all(&self) -> Result<Vec<Proxy>, StoreError> {
        let guard = self.proxies.read();
        let mut scored: Vec<&(Proxy, i64)> = guard
            .iter()
            .filter(|(_, s)| self.scores.contains(*s))
            .collect();
        scored.sort_by_key(|(_, s)| *s);
        Ok(scored.into_iter().map(|(p, _)| p.clone()).collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self
            .proxies
            .read()
            .iter()
            .filter(|(_, s)| self.scores.contains(*s))
            .count())
    }
}

/// Hands out the same shared in-memory pool to every request.
#[derive(Clone)]
pub struct MemoryConnector {
    store: Arc<MemoryProxyStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryProxyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self) -> Result<Arc<dyn ProxyStore>, StoreError> {
        Ok(self.store.clone() as Arc<dyn ProxyStore>)
    }
}
