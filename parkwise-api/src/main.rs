use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use parkwise_api::{app, AppState};
use parkwise_core::SystemClock;
use parkwise_store::{app_config::Config, DbClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkwise_api=debug,parkwise_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;

    let db_path = config.database.resolved_path();
    let db = DbClient::new(&db_path, config.database.acquire_timeout())
        .await
        .with_context(|| format!("Failed to open parking database at {}", db_path.display()))?;
    db.migrate().await.context("Failed to migrate parking database")?;

    let app_state = AppState::from_db(
        &db,
        config.billing.rate_per_minute,
        config.ledger.recent_limit,
        Arc::new(SystemClock),
    )
    .context("Invalid billing configuration")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Parkwise listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
