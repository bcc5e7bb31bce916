use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ServiceSettings;
use crate::models::{AdCopyEvaluation, GeneratedAdCopy, GenerationRequest, Tone};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("failed to parse generated copies: {0}")] Parse(String),
    #[error("generated copy is invalid: {0}")] Invalid(String),
}

#[async_trait]
pub trait AdCopyGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedAdCopy>, GenerationError>;
}

/// Offline generator used when no API key is configured.
#[derive(Debug, Default)]
pub struct DemoGenerator;

impl DemoGenerator {
    fn opening(tone: Tone, product: &str) -> String {
        match tone {
            Tone::Formal => format!("We are pleased to present {product}."),
            Tone::Casual => format!("Say hi to {product}."),
            Tone::Humorous => format!("Warning: {product} may cause excessive smiling."),
            Tone::Professional => format!("{product} is built for people who expect results."),
            Tone::Friendly => format!("Good news, friend: {product} is here."),
        }
    }

    fn call_to_action(tone: Tone) -> &'static str {
        match tone {
            Tone::Formal => "Request your copy today.",
            Tone::Casual => "Grab yours now!",
            Tone::Humorous => "Click before your old one finds out!",
            Tone::Professional => "Get started today.",
            Tone::Friendly => "Come and see for yourself!",
        }
    }

    fn build_copies(request: &GenerationRequest) -> Vec<GeneratedAdCopy> {
        let mut rng = rand::thread_rng();
        let points = &request.appeal_points;

        (0..request.num_copies as usize)
            .map(|i| {
                // rotate so each variant leads with a different point
                let lead = &points[i % points.len()];
                let rest: Vec<&str> = points.iter().filter(|p| *p != lead).map(String::as_str).collect();
                let mut copy_text = format!("{} {} for {}.", Self::opening(request.tone, &request.product_name), lead, request.target_audience);
                if !rest.is_empty() {
                    copy_text.push_str(&format!(" Plus: {}.", rest.join(", ")));
                }
                GeneratedAdCopy {
                    copy_text,
                    headline: Some(format!("{}: {}", request.product_name, lead)),
                    call_to_action: Some(Self::call_to_action(request.tone).to_string()),
                    evaluation: Some(AdCopyEvaluation {
                        relevance_score: Some(rng.gen_range(0.6..0.99)),
                        creativity_score: Some(rng.gen_range(0.6..0.99)),
                        target_audience_appeal: Some(format!(
                            "Leads with '{}', which speaks directly to {}.", lead, request.target_audience
                        )),
                    }),
                }
            })
            .collect()
    }
}

#[async_trait]
impl AdCopyGenerator for DemoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedAdCopy>, GenerationError> {
        info!("Using demo mode - generating template copies");
        if request.appeal_points.is_empty() {
            return Err(GenerationError::Invalid("at least one appeal point is required".into()));
        }
        Ok(Self::build_copies(request))
    }
}

pub struct ClaudeGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ClaudeGenerator {
    pub fn new(settings: &ServiceSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.anthropic_api_key.clone(),
            base_url: settings.anthropic_api_base.trim_end_matches('/').to_string(),
            model: settings.anthropic_model.clone(),
        }
    }

    pub fn build_prompt(request: &GenerationRequest) -> String {
        let points = request.appeal_points.iter().map(|p| format!("- {p}")).collect::<Vec<_>>().join("\n");
        format!(
            "You are a professional advertising copywriter. Write {n} effective ad copies from the brief below.\n\n\
            Product or service: {product}\n\
            Target audience: {audience}\n\
            Appeal points:\n{points}\n\
            Tone: {tone_desc}\n\n\
            Answer with JSON only, in this shape:\n\
            {{\"adCopies\": [{{\"copyText\": \"body (required)\", \"headline\": \"optional\", \"callToAction\": \"optional\", \
            \"evaluation\": {{\"relevanceScore\": 0.9, \"creativityScore\": 0.8, \"targetAudienceAppeal\": \"comment\"}}}}]}}",
            n = request.num_copies,
            product = request.product_name,
            audience = request.target_audience,
            tone_desc = request.tone.description(),
        )
    }

    async fn perform_api_call(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1/messages", self.base_url);
        info!("🔗 Making request to: {}", url);

        let request_body = json!({
            "model": self.model,
            "max_tokens": 2000,
            "temperature": 0.7,
            "messages": [{"role": "user", "content": prompt}]
        });

        let response = self.client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);
        let response_text = response.text().await.map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(GenerationError::Http(format!("status={} body={}", status, response_text)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&response_text)
            .map_err(|e| GenerationError::Parse(format!("messages response: {}", e)))?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| GenerationError::Parse("no text content in response".into()))
    }
}

#[async_trait]
impl AdCopyGenerator for ClaudeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedAdCopy>, GenerationError> {
        let prompt = Self::build_prompt(request);
        let text = self.perform_api_call(&prompt).await?;
        let copies = parse_ad_copies(&text)?;
        info!("✅ Claude produced {} copies for '{}'", copies.len(), request.product_name);
        Ok(copies)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdCopiesPayload {
    #[serde(default)]
    ad_copies: Vec<GeneratedAdCopy>,
}

/// Pulls the outermost `{...}` span out of model output and checks every copy.
pub fn parse_ad_copies(text: &str) -> Result<Vec<GeneratedAdCopy>, GenerationError> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return Err(GenerationError::Parse("no JSON object found".into())),
    };
    let payload: AdCopiesPayload = serde_json::from_str(&text[start..=end])
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    for copy in &payload.ad_copies {
        if copy.copy_text.trim().is_empty() {
            return Err(GenerationError::Invalid("copy text is required".into()));
        }
        if let Some(eval) = &copy.evaluation {
            for (name, score) in [("relevance", eval.relevance_score), ("creativity", eval.creativity_score)] {
                if let Some(s) = score {
                    if !(0.0..=1.0).contains(&s) {
                        return Err(GenerationError::Invalid(format!("{} score {} is outside 0.0-1.0", name, s)));
                    }
                }
            }
            if eval.target_audience_appeal.as_deref().is_some_and(|a| a.trim().is_empty()) {
                return Err(GenerationError::Invalid("target audience appeal must not be blank".into()));
            }
        }
    }
    Ok(payload.ad_copies)
}
