use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

pub const MIN_COPIES: u8 = 1;
pub const MAX_COPIES: u8 = 5;
pub const DEFAULT_NUM_COPIES: u8 = 3;

fn default_num_copies() -> u8 { DEFAULT_NUM_COPIES }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Humorous,
    #[default]
    Professional,
    Friendly,
}

impl Tone {
    pub const ALL: [Tone; 5] = [Tone::Formal, Tone::Casual, Tone::Humorous, Tone::Professional, Tone::Friendly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Humorous => "humorous",
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
        }
    }

    /// Short wording guide handed to the generator prompt.
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Formal => "polite and dignified wording",
            Tone::Casual => "approachable, relaxed wording",
            Tone::Humorous => "playful wording with a touch of humour",
            Tone::Professional => "expert wording that builds trust",
            Tone::Friendly => "warm wording that feels close to the reader",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tone: {}", s))
    }
}

/// Body of `POST /generate-ad-copy`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub product_name: String,
    pub target_audience: String,
    pub appeal_points: Vec<String>,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_num_copies")]
    pub num_copies: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name is required")] MissingProductName,
    #[error("target audience is required")] MissingTargetAudience,
    #[error("at least one appeal point is required")] NoAppealPoints,
    #[error("appeal points must not be blank")] BlankAppealPoint,
    #[error("number of copies must be between 1 and 5, got {0}")] NumCopiesOutOfRange(u8),
}

impl GenerationRequest {
    /// Rules the generation service enforces before any copy is produced.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::MissingProductName);
        }
        if self.target_audience.trim().is_empty() {
            return Err(ValidationError::MissingTargetAudience);
        }
        if self.appeal_points.is_empty() {
            return Err(ValidationError::NoAppealPoints);
        }
        if self.appeal_points.iter().any(|p| p.trim().is_empty()) {
            return Err(ValidationError::BlankAppealPoint);
        }
        if !(MIN_COPIES..=MAX_COPIES).contains(&self.num_copies) {
            return Err(ValidationError::NumCopiesOutOfRange(self.num_copies));
        }
        Ok(())
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdCopyEvaluation {
    pub relevance_score: Option<f64>,
    pub creativity_score: Option<f64>,
    pub target_audience_appeal: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAdCopy {
    pub copy_text: String,
    pub headline: Option<String>,
    pub call_to_action: Option<String>,
    pub evaluation: Option<AdCopyEvaluation>,
}

impl GeneratedAdCopy {
    pub fn new(copy_text: impl Into<String>) -> Self {
        Self { copy_text: copy_text.into(), headline: None, call_to_action: None, evaluation: None }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub generated_copies: Vec<GeneratedAdCopy>,
}

/// Error body returned by the generation service. Clients parse it best-effort,
/// so both fields tolerate being absent.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        Self { message: Some(message.into()), code: Some(code.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            product_name: "Watch X".into(),
            target_audience: "20s-40s professionals".into(),
            appeal_points: vec!["5-day battery".into()],
            tone: Tone::Casual,
            num_copies: 2,
        }
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(value, json!({
            "productName": "Watch X",
            "targetAudience": "20s-40s professionals",
            "appealPoints": ["5-day battery"],
            "tone": "casual",
            "numCopies": 2
        }));
    }

    #[test]
    fn request_defaults_tone_and_count() {
        let parsed: GenerationRequest = serde_json::from_value(json!({
            "productName": "Watch X",
            "targetAudience": "runners",
            "appealPoints": ["light"]
        })).unwrap();
        assert_eq!(parsed.tone, Tone::Professional);
        assert_eq!(parsed.num_copies, 3);
    }

    #[test]
    fn absent_optional_fields_stay_absent() {
        let copy = GeneratedAdCopy {
            copy_text: "Tick tock".into(),
            headline: None,
            call_to_action: Some("Buy now".into()),
            evaluation: Some(AdCopyEvaluation { relevance_score: Some(0.5), ..Default::default() }),
        };
        let value = serde_json::to_value(&copy).unwrap();
        assert_eq!(value, json!({
            "copyText": "Tick tock",
            "callToAction": "Buy now",
            "evaluation": { "relevanceScore": 0.5 }
        }));
    }

    #[test]
    fn validation_rejects_bad_briefs() {
        let mut r = request();
        r.product_name = "   ".into();
        assert_eq!(r.validate(), Err(ValidationError::MissingProductName));

        let mut r = request();
        r.appeal_points = vec!["ok".into(), " ".into()];
        assert_eq!(r.validate(), Err(ValidationError::BlankAppealPoint));

        let mut r = request();
        r.num_copies = 6;
        assert_eq!(r.validate(), Err(ValidationError::NumCopiesOutOfRange(6)));

        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("Humorous".parse::<Tone>(), Ok(Tone::Humorous));
        assert!("sarcastic".parse::<Tone>().is_err());
    }
}
