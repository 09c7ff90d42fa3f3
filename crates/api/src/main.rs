//! PharmaDNA role admin API server binary entrypoint.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pharma_admin::chain::{ContractRoleSync, is_plausible_contract_address};
use pharma_admin::service::AdminService;
use pharma_admin::store::PgRoleStore;
use pharma_common::config::AppConfig;
use pharma_common::db::{create_pool, run_migrations};

use pharma_api::routes::create_router;
use pharma_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pharma_api=debug,pharma_admin=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting PharmaDNA role admin API...");

    let config = AppConfig::from_env()?;

    if config.owner_private_key.is_none() {
        tracing::warn!("OWNER_PRIVATE_KEY not set; role assignments will not reach the contract");
    }
    if !config
        .contract_address
        .as_deref()
        .is_some_and(is_plausible_contract_address)
    {
        tracing::warn!("PHARMA_NFT_ADDRESS not configured; role assignments will not reach the contract");
    }

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    let admin = AdminService::new(
        Arc::new(PgRoleStore::new(pool)),
        Arc::new(ContractRoleSync::from_config(&config)),
    )
    .with_role_validation_before_write(config.validate_role_before_write);

    let app = create_router(AppState::new(admin))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(addr = %config.listen_addr, rpc_url = %config.rpc_url, "API server listening");

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("PharmaDNA role admin API stopped.");
    Ok(())
}
