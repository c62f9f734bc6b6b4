use crate::domain::value_objects::{ScoreRange, PROXY_SCORE_MAX, PROXY_SCORE_MIN};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // API server settings
    pub api_host: String,
    pub api_port: u16,
    pub api_threaded: bool,
    pub api_key: String,

    // Proxy store settings
    pub db_path: Option<String>,
    pub score_min: i64,
    pub score_max: i64,

    // Region lookup settings
    pub geoip_path: String,
    pub geoip_locale: String,

    pub app_env: String,
    pub debug: bool,
}

impl Config {
    /// `host:port` to bind, bracketing IPv6 hosts.
    pub fn listen_addr(&self) -> String {
        if self.api_host.contains(':') && !self.api_host.starts_with('[') {
            format!("[{}]:{}", self.api_host, self.api_port)
        } else {
            format!("{}:{}", self.api_host, self.api_port)
        }
    }

    pub fn scores(&self) -> ScoreRange {
        ScoreRange::new(self.score_min, self.score_max)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 5555,
            api_threaded: true,
            api_key: String::new(),
            db_path: None,
            score_min: PROXY_SCORE_MIN,
            score_max: PROXY_SCORE_MAX,
            geoip_path: "GeoLite2-Country.mmdb".to_string(),
            geoip_locale: "en".to_string(),
            app_env: "dev".to_string(),
            debug: true,
        }
    }
}

fn parse_bool(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Load configuration from the process environment.
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through `lookup`, falling back to defaults for
/// missing or unparsable values.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let api_host = lookup("PROXYPOOL_API_HOST").unwrap_or(defaults.api_host);

    let api_port = lookup("PROXYPOOL_API_PORT")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.api_port);

    let api_threaded = lookup("PROXYPOOL_API_THREADED")
        .map(|v| parse_bool(&v))
        .unwrap_or(defaults.api_threaded);

    let api_key = lookup("PROXYPOOL_API_KEY").unwrap_or(defaults.api_key);

    let db_path = lookup("PROXYPOOL_DB_PATH").filter(|v| !v.is_empty());

    let score_min = lookup("PROXYPOOL_SCORE_MIN")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.score_min);

    let score_max = lookup("PROXYPOOL_SCORE_MAX")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.score_max);

    let geoip_path = lookup("PROXYPOOL_GEOIP_PATH").unwrap_or(defaults.geoip_path);

    let geoip_locale = lookup("PROXYPOOL_GEOIP_LOCALE").unwrap_or(defaults.geoip_locale);

    let app_env = lookup("APP_ENV")
        .map(|v| v.to_lowercase())
        .unwrap_or(defaults.app_env);
    let debug = app_env == "dev";

    if score_min > score_max {
        anyhow::bail!(
            "PROXYPOOL_SCORE_MIN ({}) must not exceed PROXYPOOL_SCORE_MAX ({})",
            score_min,
            score_max
        );
    }

    Ok(Config {
        api_host,
        api_port,
        api_threaded,
        api_key,
        db_path,
        score_min,
        score_max,
        geoip_path,
        geoip_locale,
        app_env,
        debug,
    })
}
