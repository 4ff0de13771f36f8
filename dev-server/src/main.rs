//! Development server for studio UI work
//!
//! Runs the in-memory backend on a fixed port and seeds it with a sample
//! studio, so the front end has something to show.
//!
//! Usage: cargo run -p dev-server
//!
//! Environment (read from `.env` too):
//! - DEV_SERVER_PORT: port to listen on (default 8000)
//! - API_TOKEN: when set, requests must carry it as a bearer token

use anyhow::{Context, Result};
use test_helpers::{BackendOptions, mock::DevDataset, telemetry};
use tracing::info;

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let port = match std::env::var("DEV_SERVER_PORT") {
        Ok(port) => port
            .parse()
            .with_context(|| format!("invalid DEV_SERVER_PORT: {port}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let token = std::env::var("API_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());

    info!("🚀 Starting studio development server");
    if token.is_some() {
        info!("🔒 Requests must carry the API_TOKEN bearer token");
    }

    let app = test_helpers::spawn_app_on_port(
        port,
        BackendOptions {
            token,
            ..Default::default()
        },
    )
    .await?;
    info!("✅ API server running on {}", app.address());

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: {}", app.address());
    info!(
        "   UI:  cd ui && BACKEND_URL={} trunk serve",
        app.address()
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
