use crate::config::settings::AppConfig;
use crate::infrastructure::process::runner::TokioProcessRunner;
use crate::state::AppState;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new();
    let state = AppState::new(config.clone(), Arc::new(TokioProcessRunner));
    state.storage.ensure_dirs().await?;

    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
