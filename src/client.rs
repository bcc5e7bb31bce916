use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{ErrorResponse, GenerationRequest, GenerationResponse};

pub const GENERATE_PATH: &str = "/generate-ad-copy";

/// Everything that can go wrong between sending a brief and holding the copies.
/// `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: u16, code: Option<String>, message: String },
    #[error("Could not reach the ad generation service")]
    Transport(String),
    #[error("Unexpected response from the ad generation service")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self { ApiError::Status { status, .. } => Some(*status), _ => None }
    }

    pub fn code(&self) -> Option<&str> {
        match self { ApiError::Status { code, .. } => code.as_deref(), _ => None }
    }

    /// Builds the error for a non-2xx reply, preferring the service's own message.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let fallback = match status.canonical_reason() {
            Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        };
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => ApiError::Status {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.message.filter(|m| !m.trim().is_empty()).unwrap_or(fallback),
            },
            Err(_) => ApiError::Status { status: status.as_u16(), code: None, message: fallback },
        }
    }
}

/// The one call the console makes against the generation service.
#[async_trait]
pub trait AdCopyApi: Send + Sync {
    async fn generate_ad_copy(&self, request: &GenerationRequest) -> Result<GenerationResponse, ApiError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url }
    }

    pub fn base_url(&self) -> &str { &self.base_url }
}

#[async_trait]
impl AdCopyApi for ApiClient {
    async fn generate_ad_copy(&self, request: &GenerationRequest) -> Result<GenerationResponse, ApiError> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        info!("🔗 Requesting {} copies for '{}' from {}", request.num_copies, request.product_name, url);

        let response = self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Transport failure calling {}: {}", url, e);
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            error!(status = status.as_u16(), code = ?err.code(), "❌ Service returned an error: {}", err);
            return Err(err);
        }

        serde_json::from_str::<GenerationResponse>(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            error!("❌ Could not parse generation response: {}: {}", e, preview);
            ApiError::Decode(e.to_string())
        })
    }
}
