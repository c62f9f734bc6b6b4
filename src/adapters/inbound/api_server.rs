//! Proxy Pool Query API
//!
//! Read-only HTTP surface over the proxy pool: a random proxy, the full
//! list, the pool size and a per-country breakdown. Every route sits
//! behind the API key gate.

use super::auth::api_key_middleware;
use super::error::ApiError;
use super::request_context::RequestContext;
use crate::domain::entities::Proxy;
use crate::domain::ports::{RegionResolver, StoreConnector};
use crate::domain::services::{count_by_region, RegionCounts};
use crate::infrastructure::shutdown_signal;
use axum::{
    extract::State,
    middleware,
    response::Html,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

const WELCOME_PAGE: &str = "<h2>Welcome to Proxy Pool System</h2>";

/// Shared state handed to every request.
///
/// Nothing in here is request-specific; per-request state lives in
/// [`RequestContext`].
#[derive(Clone)]
pub struct ApiState {
    /// Opens a store handle for each request
    pub connector: Arc<dyn StoreConnector>,
    /// Process-wide region resolver
    pub resolver: Arc<dyn RegionResolver>,
    /// Expected `API-KEY` header value; empty disables the check
    pub api_key: Arc<str>,
}

impl ApiState {
    pub fn new(
        connector: Arc<dyn StoreConnector>,
        resolver: Arc<dyn RegionResolver>,
        api_key: &str,
    ) -> Self {
        Self {
            connector,
            resolver,
            api_key: Arc::from(api_key),
        }
    }
}

/// Build the router with the API key gate applied to every route.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/random", get(random_handler))
        .route("/all", get(all_handler))
        .route("/count", get(count_handler))
        .route("/count_by_region", get(count_by_region_handler))
        .layer(middleware::from_fn_with_state(state.clone(), api_key_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server for the query API.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, state: ApiState) -> Self {
        Self { listen_addr, state }
    }

    /// Run until Ctrl+C or SIGTERM.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("proxy pool API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("proxy pool API stopped");
        Ok(())
    }
}

// Handler functions

async fn index_handler() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

async fn random_handler(ctx: RequestContext) -> Result<String, ApiError> {
    let conn = ctx.connection().await?;
    let proxy = conn.random().await?;
    Ok(proxy.to_string())
}

async fn all_handler(ctx: RequestContext) -> Result<String, ApiError> {
    let conn = ctx.connection().await?;
    let proxies = conn.all().await?;
    Ok(render_lines(&proxies))
}

async fn count_handler(ctx: RequestContext) -> Result<String, ApiError> {
    let conn = ctx.connection().await?;
    Ok(conn.count().await?.to_string())
}

async fn count_by_region_handler(
    State(state): State<ApiState>,
    ctx: RequestContext,
) -> Result<Json<RegionCounts>, ApiError> {
    let conn = ctx.connection().await?;
    let proxies = conn.all().await?;

    let counts = count_by_region(&proxies, state.resolver.as_ref());
    tracing::debug!(
        "count_by_region: {} proxies across {} regions",
        proxies.len(),
        counts.len()
    );
    Ok(Json(counts))
}

/// One `host:port` per line, each line newline-terminated.
fn render_lines(proxies: &[Proxy]) -> String {
    proxies.iter().map(|p| format!("{}\n", p)).collect()
}
