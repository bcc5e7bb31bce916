use std::{net::SocketAddr, sync::Arc};

use ad_copy_console::{
    config::ServiceSettings,
    generator::{AdCopyGenerator, ClaudeGenerator, DemoGenerator},
    init_tracing,
    service::{self, ServiceState},
};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let settings = ServiceSettings::from_env();
    let generator: Arc<dyn AdCopyGenerator> = if settings.demo_mode() {
        tracing::info!("No ANTHROPIC_API_KEY set, serving demo copies");
        Arc::new(DemoGenerator)
    } else {
        tracing::info!("Using API key: {} (model {})", settings.masked_key(), settings.anthropic_model);
        Arc::new(ClaudeGenerator::new(&settings))
    };

    let state = ServiceState {
        generator,
        app_name: settings.app_name.clone(),
        app_version: settings.app_version.clone(),
    };
    let app = service::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "Starting {} v{}", settings.app_name, settings.app_version);
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("service stopped")?;
    Ok(())
}
