use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use plan_scheduler::app::{AppState, build_router};
use plan_scheduler::config::ServerConfig;
use plan_scheduler::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(Store::new(&config.db_path));
    let app = build_router(state, &config.static_dir);

    info!("server running at http://{}", config.addr);
    info!("static files: {}", config.static_dir.display());
    info!("store: {}", config.db_path.display());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
