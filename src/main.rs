use std::{net::SocketAddr, sync::Arc};

use ad_copy_console::{client::ApiClient, config::ConsoleSettings, console::{self, AppState}, init_tracing};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();
    init_tracing();

    let settings = ConsoleSettings::from_env();
    tracing::info!("Using ad generation service at {}", settings.api_base_url);
    let state = AppState::new(Arc::new(ApiClient::new(settings.api_base_url.clone())))
        .with_session_ttl(chrono::Duration::seconds(settings.session_ttl_secs));

    // Sweep idle sessions even when no new page loads come in
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            tick.tick().await;
            sweeper.prune_idle(chrono::Utc::now());
        }
    });

    let app = console::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "Starting console");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("console server stopped")?;
    Ok(())
}
