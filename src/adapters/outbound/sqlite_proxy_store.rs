//! SQLite Proxy Store
//!
//! Implements ProxyStore over a `proxies` table in a SQLite file.
//! Every request opens its own read-only connection through SqliteConnector.

use crate::domain::entities::Proxy;
use crate::domain::ports::{ProxyStore, StoreConnector, StoreError};
use crate::domain::value_objects::ScoreRange;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::sync::Arc;

/// Table layout expected in the pool database.
///
/// The API never writes to the file; whatever fills the pool owns the
/// schema and should create it with this statement.
pub const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS proxies (
    host TEXT NOT NULL,
    port INTEGER NOT NULL,
    score INTEGER NOT NULL,
    PRIMARY KEY (host, port)
)";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}

/// SQLite-backed proxy store.
///
/// rusqlite connections are blocking, so every query runs on the
/// blocking pool while holding the connection lock.
pub struct SqliteProxyStore {
    conn: Arc<Mutex<Connection>>,
    scores: ScoreRange,
}

impl SqliteProxyStore {
    /// Open an existing database at `db_path` read-only.
    ///
    /// Fails with [`StoreError::Connect`] if the file does not exist. A
    /// missing `proxies` table is not detected here; it surfaces as a
    /// query error on first use.
    pub fn open(db_path: &str, scores: ScoreRange) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| StoreError::Connect(format!("{}: {}", db_path, e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            scores,
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, ScoreRange) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        let scores = self.scores;
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard, scores)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    fn row_to_proxy(row: &Row) -> rusqlite::Result<Proxy> {
        let port: i64 = row.get(1)?;
        Ok(Proxy {
            host: row.get(0)?,
            port: u16::try_from(port)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, port))?,
        })
    }

    fn random_with_score(conn: &Connection, min: i64, max: i64) -> rusqlite::Result<Option<Proxy>> {
        conn.query_row(
            "SELECT host, port FROM proxies
             WHERE score BETWEEN ?1 AND ?2
             ORDER BY RANDOM() LIMIT 1",
            params![min, max],
            |row| Self::row_to_proxy(row),
        )
        .optional()
    }
}

#[async_trait]
impl ProxyStore for SqliteProxyStore {
    async fn random(&self) -> Result<Proxy, StoreError> {
        self.with_conn(|conn, scores| {
            if let Some(proxy) = Self::random_with_score(conn, scores.max, scores.max)? {
                return Ok(proxy);
            }
            Self::random_with_score(conn, scores.min, scores.max)?.ok_or(StoreError::PoolEmpty)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<Proxy>, StoreError> {
        self.with_conn(|conn, scores| {
            let mut stmt = conn.prepare(
                "SELECT host, port FROM proxies
                 WHERE score BETWEEN ?1 AND ?2
                 ORDER BY score ASC, rowid ASC",
            )?;
            let proxies = stmt
                .query_map(params![scores.min, scores.max], |row| Self::row_to_proxy(row))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(proxies)
        })
        .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn, scores| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM proxies WHERE score BETWEEN ?1 AND ?2",
                params![scores.min, scores.max],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
        .await
    }
}

/// Opens a fresh SQLite connection per call.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    db_path: String,
    scores: ScoreRange,
}

impl SqliteConnector {
    pub fn new(db_path: impl Into<String>, scores: ScoreRange) -> Self {
        Self {
            db_path: db_path.into(),
            scores,
        }
    }
}

#[async_trait]
impl StoreConnector for SqliteConnector {
    async fn connect(&self) -> Result<Arc<dyn ProxyStore>, StoreError> {
        let db_path = self.db_path.clone();
        let scores = self.scores;
        let store = tokio::task::spawn_blocking(move || SqliteProxyStore::open(&db_path, scores))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;
        tracing::debug!("opened proxy store at {}", self.db_path);
        Ok(Arc::new(store) as Arc<dyn ProxyStore>)
    }
}
