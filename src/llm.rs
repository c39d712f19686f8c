use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Search-grounded `generateContent` client. Only exists when a credential is configured.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let api_key = config
            .api_key()
            .ok_or(FetchError::MissingCredential)?
            .to_string();

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.endpoint().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature(),
            client,
        })
    }

    /// Issues exactly one request and returns the concatenated text of the first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, FetchError> {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{}/models/{}:generateContent", base, self.model);

        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }],
                }
            ],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "temperature": self.temperature,
            },
        });

        debug!(model = %self.model, "requesting search-grounded generation");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        let text_body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP {}: {}",
                status, text_body
            )));
        }

        let value: Value = serde_json::from_str(&text_body)
            .map_err(|err| FetchError::Transport(format!("unreadable response envelope: {err}")))?;

        response_text(&value).ok_or(FetchError::EmptyResponse)
    }
}

fn response_text(value: &Value) -> Option<String> {
    let text = value
        .get("candidates")
        .and_then(|candidates| candidates.as_array())
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())?
        .iter()
        .filter_map(|part| part.get("text").and_then(|text| text.as_str()))
        .collect::<String>();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
