use serde::Serialize;
use tracing::{info, warn};

use crate::client::{AdCopyApi, ApiError};
use crate::models::{GeneratedAdCopy, GenerationRequest, GenerationResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// What the page renders from. At most one of `error` and `results` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleState {
    pub pending: bool,
    pub error: Option<String>,
    pub results: Option<Vec<GeneratedAdCopy>>,
}

impl LifecycleState {
    pub fn phase(&self) -> Phase {
        match (self.pending, &self.error, &self.results) {
            (true, _, _) => Phase::Pending,
            (false, Some(_), _) => Phase::Failed,
            (false, None, Some(_)) => Phase::Succeeded,
            (false, None, None) => Phase::Idle,
        }
    }
}

/// Owns one generation call at a time: `Idle -> Pending -> Succeeded | Failed`,
/// and back to `Idle` through [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct LifecycleController {
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> &LifecycleState { &self.state }

    pub fn phase(&self) -> Phase { self.state.phase() }

    pub fn is_pending(&self) -> bool { self.state.pending }

    /// Enters `Pending` and clears the previous outcome. Returns `false`
    /// and leaves everything untouched if a call is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.state.pending {
            warn!("⚠️ Generation already in flight, ignoring new submit");
            return false;
        }
        self.state = LifecycleState { pending: true, error: None, results: None };
        true
    }

    /// Records the outcome of the call started by [`begin`](Self::begin).
    pub fn settle(&mut self, outcome: Result<GenerationResponse, ApiError>) {
        self.state = match outcome {
            Ok(response) => {
                info!("✅ Received {} generated copies", response.generated_copies.len());
                LifecycleState { pending: false, error: None, results: Some(response.generated_copies) }
            }
            Err(e) => {
                warn!(status = ?e.status(), "❌ Generation failed: {}", e);
                LifecycleState { pending: false, error: Some(e.to_string()), results: None }
            }
        };
    }

    /// Runs one generation call to completion. Failures end up in
    /// `state().error`; nothing is returned to the caller.
    pub async fn submit<A>(&mut self, api: &A, request: &GenerationRequest)
    where
        A: AdCopyApi + ?Sized,
    {
        if !self.begin() {
            return;
        }
        let outcome = api.generate_ad_copy(request).await;
        self.settle(outcome);
    }

    pub fn reset(&mut self) {
        self.state = LifecycleState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tone;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Copies(usize),
        Fail(fn() -> ApiError),
    }

    struct StubApi {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl StubApi {
        fn new(reply: Reply) -> Self { Self { reply, calls: AtomicUsize::new(0) } }
    }

    #[async_trait]
    impl AdCopyApi for StubApi {
        async fn generate_ad_copy(&self, _request: &GenerationRequest) -> Result<GenerationResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Copies(n) => Ok(GenerationResponse {
                    generated_copies: (0..*n).map(|i| GeneratedAdCopy::new(format!("copy {}", i))).collect(),
                }),
                Reply::Fail(make) => Err(make()),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            product_name: "Watch X".into(),
            target_audience: "20s-40s professionals".into(),
            appeal_points: vec!["5-day battery".into()],
            tone: Tone::Casual,
            num_copies: 2,
        }
    }

    fn assert_settled(state: &LifecycleState) {
        assert!(!state.pending);
        assert!(state.error.is_some() ^ state.results.is_some());
    }

    #[tokio::test]
    async fn success_stores_results_in_order() {
        let api = StubApi::new(Reply::Copies(2));
        let mut ctl = LifecycleController::new();
        ctl.submit(&api, &request()).await;

        assert_settled(ctl.state());
        assert_eq!(ctl.phase(), Phase::Succeeded);
        let texts: Vec<_> = ctl.state().results.as_ref().unwrap().iter().map(|c| c.copy_text.as_str()).collect();
        assert_eq!(texts, vec!["copy 0", "copy 1"]);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_stores_message_only() {
        let api = StubApi::new(Reply::Fail(|| ApiError::Transport("connection refused".into())));
        let mut ctl = LifecycleController::new();
        ctl.submit(&api, &request()).await;

        assert_settled(ctl.state());
        assert_eq!(ctl.phase(), Phase::Failed);
        assert_eq!(ctl.state().error.as_deref(), Some("Could not reach the ad generation service"));
        assert_eq!(ctl.state().results, None);
    }

    #[tokio::test]
    async fn new_submit_clears_previous_outcome() {
        let failing = StubApi::new(Reply::Fail(|| ApiError::Decode("eof".into())));
        let working = StubApi::new(Reply::Copies(1));
        let mut ctl = LifecycleController::new();

        ctl.submit(&failing, &request()).await;
        assert_eq!(ctl.phase(), Phase::Failed);
        ctl.submit(&working, &request()).await;
        assert_eq!(ctl.phase(), Phase::Succeeded);
        assert_eq!(ctl.state().error, None);
    }

    #[tokio::test]
    async fn submit_while_pending_makes_no_call() {
        let api = StubApi::new(Reply::Copies(1));
        let mut ctl = LifecycleController::new();
        assert!(ctl.begin());
        ctl.submit(&api, &request()).await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(ctl.is_pending());
    }

    #[test]
    fn reset_returns_to_idle_from_every_phase() {
        let mut ctl = LifecycleController::new();
        ctl.reset();
        assert_eq!(*ctl.state(), LifecycleState::default());

        ctl.begin();
        ctl.reset();
        assert_eq!(ctl.phase(), Phase::Idle);

        ctl.begin();
        ctl.settle(Ok(GenerationResponse { generated_copies: vec![GeneratedAdCopy::new("a")] }));
        ctl.reset();
        assert_eq!(*ctl.state(), LifecycleState::default());

        ctl.begin();
        ctl.settle(Err(ApiError::Transport("down".into())));
        ctl.reset();
        assert_eq!(*ctl.state(), LifecycleState { pending: false, error: None, results: None });
    }
}
