use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use include_dir::{include_dir, Dir};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{AdCopyApi, ApiError},
    draft::RequestDraft,
    lifecycle::{LifecycleController, LifecycleState, Phase},
    models::{ErrorResponse, Tone},
    render::render_results,
};

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// One browser page: the form being edited and the call it drives.
#[derive(Debug)]
pub struct Session {
    pub draft: RequestDraft,
    pub lifecycle: LifecycleController,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self { draft: RequestDraft::new(), lifecycle: LifecycleController::new(), created_at: now, updated_at: now }
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub api: Arc<dyn AdCopyApi>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(api: Arc<dyn AdCopyApi>) -> Self {
        Self { sessions: Arc::default(), api, session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS) }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Drops sessions untouched for longer than the TTL. Sessions with a call
    /// in flight are kept until that call settles.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let mut guard = self.sessions.write();
        let before = guard.len();
        guard.retain(|_, s| s.lifecycle.is_pending() || now - s.updated_at <= self.session_ttl);
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::info!("🧹 Evicted {} idle console sessions", evicted);
        }
        evicted
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub draft: RequestDraft,
    pub eligible: bool,
    pub phase: Phase,
    pub state: LifecycleState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    fn of(id: Uuid, s: &Session) -> Self {
        Self {
            id,
            draft: s.draft.clone(),
            eligible: s.draft.is_eligible(),
            phase: s.lifecycle.phase(),
            state: s.lifecycle.state().clone(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    pub product_name: Option<String>,
    pub target_audience: Option<String>,
    pub tone: Option<Tone>,
    pub num_copies: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct AppealPointBody {
    pub text: String,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: &str, code: &str) -> Rejection {
    (status, Json(ErrorResponse::new(message, code)))
}

fn not_found() -> Rejection {
    reject(StatusCode::NOT_FOUND, "session not found", "NOT_FOUND")
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/*path", get(asset))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/draft", patch(update_draft))
        .route("/api/sessions/:id/appeal-points", post(add_appeal_point))
        .route("/api/sessions/:id/appeal-points/:index", delete(remove_appeal_point))
        .route("/api/sessions/:id/submit", post(submit))
        .route("/api/sessions/:id/reset", post(reset))
        .route("/api/sessions/:id/export", get(export_results))
        .with_state(state)
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn serve_asset(path: &str) -> Response {
    match ASSETS.get_file(path) {
        Some(file) => ([(header::CONTENT_TYPE, content_type(path))], file.contents()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn index() -> Response { serve_asset("index.html") }

pub async fn asset(Path(path): Path<String>) -> Response { serve_asset(&path) }

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    state.prune_idle(Utc::now());
    let id = Uuid::new_v4();
    let session = Session::new();
    let view = SessionView::of(id, &session);
    state.sessions.write().insert(id, session);
    tracing::info!("🎯 Created console session {}", id);
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<SessionView>, Rejection> {
    let guard = state.sessions.read();
    let session = guard.get(&id).ok_or_else(not_found)?;
    Ok(Json(SessionView::of(id, session)))
}

/// Applies `edit` to the session and returns the refreshed view.
fn with_session<F>(state: &AppState, id: Uuid, edit: F) -> Result<Json<SessionView>, Rejection>
where
    F: FnOnce(&mut Session),
{
    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or_else(not_found)?;
    edit(session);
    session.touch();
    Ok(Json(SessionView::of(id, session)))
}

pub async fn update_draft(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(body): Json<DraftUpdate>,
) -> Result<Json<SessionView>, Rejection> {
    with_session(&state, id, |s| {
        if let Some(name) = body.product_name { s.draft.set_product_name(name); }
        if let Some(audience) = body.target_audience { s.draft.set_target_audience(audience); }
        if let Some(tone) = body.tone { s.draft.set_tone(tone); }
        if let Some(n) = body.num_copies { s.draft.set_num_copies(n); }
    })
}

pub async fn add_appeal_point(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(body): Json<AppealPointBody>,
) -> Result<Json<SessionView>, Rejection> {
    with_session(&state, id, |s| { s.draft.add_appeal_point(&body.text); })
}

pub async fn remove_appeal_point(
    Path((id, index)): Path<(Uuid, usize)>,
    State(state): State<AppState>,
) -> Result<Json<SessionView>, Rejection> {
    with_session(&state, id, |s| { s.draft.remove_appeal_point(index); })
}

pub async fn submit(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<SessionView>, Rejection> {
    // Mark pending under the lock, call outside it
    let request = {
        let mut guard = state.sessions.write();
        let session = guard.get_mut(&id).ok_or_else(not_found)?;
        let request = session.draft.try_build().map_err(|e| {
            reject(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), "NOT_ELIGIBLE")
        })?;
        if !session.lifecycle.begin() {
            return Err(reject(StatusCode::CONFLICT, "a generation request is already in flight", "PENDING"));
        }
        session.touch();
        request
    };

    tracing::info!("🚀 Session {} submitting brief for: {}", id, request.product_name);

    // The call runs in its own task so it settles even if this request is dropped
    let task = {
        let state = state.clone();
        tokio::spawn(async move {
            let outcome = state.api.generate_ad_copy(&request).await;
            with_session(&state, id, |s| s.lifecycle.settle(outcome))
        })
    };

    match task.await {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("❌ Generation task for session {} failed: {}", id, e);
            with_session(&state, id, |s| s.lifecycle.settle(Err(ApiError::Transport(e.to_string()))))
        }
    }
}

pub async fn reset(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<SessionView>, Rejection> {
    with_session(&state, id, |s| s.lifecycle.reset())
}

pub async fn export_results(Path(id): Path<Uuid>, State(state): State<AppState>) -> Response {
    let guard = state.sessions.read();
    let Some(results) = guard.get(&id).and_then(|s| s.lifecycle.state().results.as_ref()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"ad_copies_{}.txt\"", id)),
    ];
    (StatusCode::OK, headers, render_results(results)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenerationRequest, GenerationResponse};
    use async_trait::async_trait;

    struct NoopApi;

    #[async_trait]
    impl AdCopyApi for NoopApi {
        async fn generate_ad_copy(&self, _: &GenerationRequest) -> Result<GenerationResponse, ApiError> {
            Ok(GenerationResponse { generated_copies: Vec::new() })
        }
    }

    fn aged(minutes: i64) -> Session {
        let mut s = Session::new();
        s.updated_at = Utc::now() - Duration::minutes(minutes);
        s
    }

    #[test]
    fn prune_keeps_fresh_and_pending_sessions() {
        let state = AppState::new(Arc::new(NoopApi)).with_session_ttl(Duration::minutes(30));
        let (fresh, stale, busy) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        {
            let mut guard = state.sessions.write();
            guard.insert(fresh, aged(5));
            guard.insert(stale, aged(90));
            let mut pending = aged(90);
            assert!(pending.lifecycle.begin());
            guard.insert(busy, pending);
        }

        assert_eq!(state.prune_idle(Utc::now()), 1);
        let guard = state.sessions.read();
        assert!(guard.contains_key(&fresh));
        assert!(guard.contains_key(&busy));
        assert!(!guard.contains_key(&stale));
    }

    #[test]
    fn prune_on_empty_store_is_a_no_op() {
        let state = AppState::new(Arc::new(NoopApi));
        assert_eq!(state.prune_idle(Utc::now()), 0);
    }
}
