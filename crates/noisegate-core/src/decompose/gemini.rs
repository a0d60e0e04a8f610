//! Gemini `generateContent` client.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};

use super::{build_prompt, Decomposer};
use crate::{
    config::GeminiConfig,
    error::{GateError, Result},
    models::Decomposition,
};

/// Decomposer backed by Google's Generative Language API.
pub struct GeminiDecomposer {
    config: GeminiConfig,
    http: Client,
}

impl GeminiDecomposer {
    /// Creates a client from configuration.
    ///
    /// A missing API key is not an error here; each request fails instead,
    /// so the rest of the tool keeps working offline.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GateError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, goal: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(goal, &self.config.language) }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": self.config.temperature,
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "one_thing": { "type": "STRING" },
                        "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "call_to_action": { "type": "STRING" },
                    },
                    "required": ["one_thing", "steps", "call_to_action"],
                },
            },
        })
    }
}

#[async_trait]
impl Decomposer for GeminiDecomposer {
    async fn decompose(&self, goal: &str) -> Result<Decomposition> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GateError::communication("API key is missing"))?;

        debug!("Requesting decomposition from {}", self.config.model);
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(goal))
            .send()
            .await
            .map_err(GateError::communication)?;

        let status = response.status();
        let body = response.text().await.map_err(GateError::communication)?;
        if !status.is_success() {
            warn!("Decomposition request failed with {status}: {body}");
            return Err(GateError::communication(format!("service returned {status}")));
        }

        parse_response(&body)
    }
}

/// Extracts the decomposition from a `generateContent` response body.
///
/// The model's answer is the text of the first part of the first candidate,
/// itself a JSON document. Blank steps are dropped.
pub(crate) fn parse_response(body: &str) -> Result<Decomposition> {
    let envelope: Value = serde_json::from_str(body).map_err(GateError::communication)?;
    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| GateError::communication("No response from AI"))?;

    let mut decomposition: Decomposition =
        serde_json::from_str(text).map_err(GateError::communication)?;

    decomposition.one_thing = decomposition.one_thing.trim().to_string();
    decomposition.call_to_action = decomposition.call_to_action.trim().to_string();
    decomposition.steps = decomposition
        .steps
        .into_iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    Ok(decomposition)
}
