mod auth;
mod config;
mod error;
mod routes;

use std::sync::Arc;

use config::AppConfig;
use handover_core::services::{HandoverStore, StoreOptions};
use routes::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("handover_api=info".parse()?)
                .add_directive("handover_core=info".parse()?),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting handover-api with config: {:?}", config);

    let store = HandoverStore::open_path(
        config.db_path.clone(),
        StoreOptions {
            require_signatures_on_import: config.import_require_signatures,
        },
    )
    .await?;

    let state = AppState::new(config, store);
    let bind_addr = state.config.bind_addr.clone();
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("handover-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
