//! Proxy Pool API - read-only query service over the proxy pool
//!
//! This is the composition root that wires together all the components.

use proxypool::adapters::inbound::{ApiServer, ApiState};
use proxypool::adapters::outbound::{
    MaxMindRegionResolver, MemoryConnector, MemoryProxyStore, NullRegionResolver, SqliteConnector,
};
use proxypool::config::{load_config, Config};
use proxypool::domain::ports::{RegionResolver, StoreConnector};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let runtime = if cfg.api_threaded {
        tokio::runtime::Builder::new_multi_thread()
    } else {
        tokio::runtime::Builder::new_current_thread()
    }
    .enable_all()
    .build()?;

    runtime.block_on(serve(cfg))
}

async fn serve(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        "starting proxy pool API listen={} env={} threaded={} auth={}",
        cfg.listen_addr(),
        cfg.app_env,
        cfg.api_threaded,
        if cfg.api_key.is_empty() { "off" } else { "on" }
    );

    // ===== COMPOSITION ROOT =====

    // Proxy store: SQLite when a path is configured, otherwise in-process
    let connector: Arc<dyn StoreConnector> = match &cfg.db_path {
        Some(path) => {
            tracing::info!("proxy store: sqlite at {}", path);
            Arc::new(SqliteConnector::new(path.clone(), cfg.scores()))
        }
        None => {
            tracing::warn!("PROXYPOOL_DB_PATH not set, serving an empty in-memory pool");
            Arc::new(MemoryConnector::new(Arc::new(MemoryProxyStore::new(
                cfg.scores(),
            ))))
        }
    };

    // Region resolver, loaded once and shared by every request
    let resolver: Arc<dyn RegionResolver> =
        match MaxMindRegionResolver::from_file(&cfg.geoip_path, &cfg.geoip_locale) {
            Ok(r) => {
                tracing::info!("GeoIP DB loaded from {}", cfg.geoip_path);
                Arc::new(r)
            }
            Err(e) => {
                tracing::error!("failed to load GeoIP DB from {}: {:?}", cfg.geoip_path, e);
                Arc::new(NullRegionResolver)
            }
        };

    let state = ApiState::new(connector, resolver, &cfg.api_key);
    ApiServer::new(cfg.listen_addr(), state).run().await
}
