//! Ad Copy Console: collect an advertising brief, send it to the ad-copy
//! generation service and keep the outcome for the page to render.

pub mod client;
pub mod config;
pub mod console;
pub mod draft;
pub mod generator;
pub mod lifecycle;
pub mod models;
pub mod render;
pub mod service;

pub use client::{AdCopyApi, ApiClient, ApiError};
pub use draft::RequestDraft;
pub use lifecycle::{LifecycleController, LifecycleState, Phase};
pub use models::{GeneratedAdCopy, GenerationRequest, GenerationResponse, Tone};

/// Shared logging setup for both binaries.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
