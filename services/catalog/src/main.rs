use sea_orm::{ConnectOptions, Database};
use tracing::info;

use cardvault_auth_types::identity::JwtSecret;
use cardvault_catalog::config::CatalogConfig;
use cardvault_catalog::router::build_router;
use cardvault_catalog::state::AppState;
use cardvault_core::config::Config;
use cardvault_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CatalogConfig::from_env();

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(config.store_timeout())
        .acquire_timeout(config.store_timeout())
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        price_currency: config.price_currency,
    };

    let router = build_router(state, config.request_timeout());
    let addr = format!("0.0.0.0:{}", config.catalog_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(currency = %config.price_currency, "catalog service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
