use crate::config::LlmConfig;
use crate::llm::models::{GenerateRequest, GenerateResponse};
use crate::llm::{LlmError, TextGenerator};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Client for a Gemini-style generateContent endpoint. One synchronous call
/// per invocation; a non-success status comes back as a `ResponseError`
/// carrying the raw body, never as a panic.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::ConnectionError(e.to_string()))?;

        // The API key travels in the URL, as the service expects. An empty
        // key still produces a well-formed URL; calls will fail upstream.
        let endpoint = format!(
            "{}/{}:generateContent?key={}",
            config.api_url.trim_end_matches('/'),
            config.model,
            config.api_key
        );

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!("Sending prompt of {} chars to LLM", prompt.len());

        let request = GenerateRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ResponseError {
                message: format!("LLM API responded with status code: {}", status),
                details: Some(body),
            });
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseError {
                message: e.to_string(),
                details: None,
            })?;

        match generate_response.first_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(LlmError::ResponseError {
                message: "No candidates in response".to_string(),
                details: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_model_and_key() {
        let config = LlmConfig {
            api_key: "secret".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_url: "https://generativelanguage.googleapis.com/v1beta/models/".to_string(),
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }
}
