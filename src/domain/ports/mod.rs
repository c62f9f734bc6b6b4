mod proxy_store;
mod region_resolver;

pub use proxy_store::{ProxyStore, StoreConnector, StoreError};
pub use region_resolver::{LookupError, RegionResolver};
