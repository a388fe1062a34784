//! brewlog-api - coffee tasting logbook REST backend
//!
//! Users register, record coffees with an optional structured tasting
//! questionnaire, and browse a public feed of other users' entries.

use anyhow::Result;
use brewlog_api::config::{Cli, Config};
use brewlog_api::{build_router, AppState};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting brewlog-api v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = Config::resolve(&cli);
    info!("Database path: {}", config.database_path.display());

    let pool = match brewlog_api::db::init_database(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, config.session_ttl_days);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("brewlog-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
