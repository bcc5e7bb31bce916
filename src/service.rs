use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::client::GENERATE_PATH;
use crate::generator::AdCopyGenerator;
use crate::models::{ErrorResponse, GenerationRequest, GenerationResponse};

pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Clone)]
pub struct ServiceState {
    pub generator: Arc<dyn AdCopyGenerator>,
    pub app_name: String,
    pub app_version: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(GENERATE_PATH, post(generate_ad_copy))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn root(State(state): State<ServiceState>) -> Json<Value> {
    Json(json!({
        "message": format!("{} is running", state.app_name),
        "version": state.app_version,
    }))
}

pub async fn generate_ad_copy(
    State(state): State<ServiceState>,
    Json(body): Json<GenerationRequest>,
) -> ApiResult<GenerationResponse> {
    if let Err(e) = body.validate() {
        warn!("🚫 Rejected brief for '{}': {}", body.product_name, e);
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string(), BAD_REQUEST))));
    }

    info!("🚀 Generating {} {} copies for product: {}", body.num_copies, body.tone, body.product_name);

    let copies = state.generator.generate(&body).await.map_err(|e| {
        error!("❌ Generation failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(format!("Ad copy generation failed: {}", e), INTERNAL_SERVER_ERROR)))
    })?;

    if copies.is_empty() {
        error!("❌ Generator returned no copies");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new("Ad copy generation returned no copies", INTERNAL_SERVER_ERROR))));
    }

    info!("✅ Generated {} copies", copies.len());
    Ok(Json(GenerationResponse { generated_copies: copies }))
}
