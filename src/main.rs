//! GatherUp backend
//!
//! Main application entry point

use anyhow::Context;
use tracing::info;

use GatherUp::{
    api::{build_router, AppState},
    config::Settings,
    database::DatabaseService,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", GatherUp::info());

    // Initialize storage
    info!("Connecting to storage backend {:?}...", settings.database.backend);
    let db = DatabaseService::connect(&settings).await?;

    // Initialize services
    let services = ServiceFactory::new(db.clone(), &settings);
    let app = build_router(AppState::new(services, db));

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GatherUp has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
