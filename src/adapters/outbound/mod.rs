mod maxmind_region_resolver;
mod memory_proxy_store;
mod sqlite_proxy_store;

pub use maxmind_region_resolver::{MaxMindRegionResolver, NullRegionResolver};
pub use memory_proxy_store::{MemoryConnector, MemoryProxyStore};
pub use sqlite_proxy_store::{SqliteConnector, SqliteProxyStore, SQLITE_SCHEMA};
