use std::time::Duration;

use serde::Deserialize;

use cardvault_core::config::Config;
use cardvault_domain::card::Currency;

/// Catalog service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HS256 secret shared with the identity provider. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 3120). Env var: `CATALOG_PORT`.
    #[serde(default = "default_port")]
    pub catalog_port: u16,
    /// Currency aggregations are computed in (default USD). Env var: `PRICE_CURRENCY`.
    #[serde(default)]
    pub price_currency: Currency,
    /// Connect/acquire timeout for the pool (default 5). Env var: `STORE_TIMEOUT_SECS`.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,
    /// Whole-request timeout (default 15). Env var: `REQUEST_TIMEOUT_SECS`.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
}

fn default_port() -> u16 {
    3120
}

fn default_store_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_connections() -> u32 {
    10
}

impl Config for CatalogConfig {}

impl CatalogConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
