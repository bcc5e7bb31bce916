use serde::Serialize;
use thiserror::Error;

use crate::models::{GenerationRequest, Tone, DEFAULT_NUM_COPIES, MAX_COPIES, MIN_COPIES};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("product name, target audience and at least one appeal point are required")]
    NotEligible,
}

/// Form values the user is still editing. Nothing here talks to the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    product_name: String,
    target_audience: String,
    appeal_points: Vec<String>,
    tone: Tone,
    num_copies: u8,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            target_audience: String::new(),
            appeal_points: Vec::new(),
            tone: Tone::default(),
            num_copies: DEFAULT_NUM_COPIES,
        }
    }
}

impl RequestDraft {
    pub fn new() -> Self { Self::default() }

    pub fn product_name(&self) -> &str { &self.product_name }
    pub fn target_audience(&self) -> &str { &self.target_audience }
    pub fn appeal_points(&self) -> &[String] { &self.appeal_points }
    pub fn tone(&self) -> Tone { self.tone }
    pub fn num_copies(&self) -> u8 { self.num_copies }

    pub fn set_product_name(&mut self, name: impl Into<String>) { self.product_name = name.into(); }
    pub fn set_target_audience(&mut self, audience: impl Into<String>) { self.target_audience = audience.into(); }
    pub fn set_tone(&mut self, tone: Tone) { self.tone = tone; }

    /// The form only offers 1..=5, anything else is pulled back into range.
    pub fn set_num_copies(&mut self, n: u8) { self.num_copies = n.clamp(MIN_COPIES, MAX_COPIES); }

    /// Appends the trimmed text unless it is empty or already listed.
    /// Returns `true` when the list changed.
    pub fn add_appeal_point(&mut self, text: &str) -> bool {
        let point = text.trim();
        if point.is_empty() || self.appeal_points.iter().any(|p| p == point) {
            return false;
        }
        self.appeal_points.push(point.to_string());
        true
    }

    pub fn remove_appeal_point(&mut self, index: usize) -> Option<String> {
        if index < self.appeal_points.len() { Some(self.appeal_points.remove(index)) } else { None }
    }

    pub fn is_eligible(&self) -> bool {
        !self.product_name.trim().is_empty()
            && !self.target_audience.trim().is_empty()
            && !self.appeal_points.is_empty()
    }

    /// Snapshot of the current fields. Only send it when [`is_eligible`](Self::is_eligible) holds.
    pub fn build(&self) -> GenerationRequest {
        GenerationRequest {
            product_name: self.product_name.clone(),
            target_audience: self.target_audience.clone(),
            appeal_points: self.appeal_points.clone(),
            tone: self.tone,
            num_copies: self.num_copies,
        }
    }

    pub fn try_build(&self) -> Result<GenerationRequest, DraftError> {
        if self.is_eligible() { Ok(self.build()) } else { Err(DraftError::NotEligible) }
    }
}
