use crate::{
    config::ProviderConfig,
    models::gemini::{
        Content, CountTokensRequest, CountTokensResponse, ErrorEnvelope, GenerateContentRequest,
        GenerateContentResponse,
    },
    providers::{Generation, ModelProvider, ProviderError, TurnRole},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Client for the Gemini `generativelanguage` REST API
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(http: Client, config: &ProviderConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// Call a model action
    /// Gemini API format: /v1beta/models/{model}:{action}
    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/models/{}:{}", self.base_url, self.model, action);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Upstream {
                status,
                message: upstream_message(&error_text),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else {
            ProviderError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn count_tokens(&self, role: TurnRole, text: &str) -> Result<u64, ProviderError> {
        let request = CountTokensRequest {
            contents: vec![Content::text(role.as_str(), text)],
        };
        let response: CountTokensResponse = self.call("countTokens", &request).await?;

        tracing::debug!(role = %role, tokens = response.total_tokens, "Counted tokens");
        Ok(response.total_tokens)
    }

    async fn generate_content(&self, prompt: &str) -> Result<Generation, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(TurnRole::User.as_str(), prompt)],
        };
        let response: GenerateContentResponse = self.call("generateContent", &request).await?;

        let text = response.first_candidate_text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            ProviderError::MalformedResponse(format!("response has no text ({})", reason))
        })?;

        tracing::debug!(
            model_version = response.model_version.as_deref().unwrap_or("unknown"),
            chars = text.chars().count(),
            "Generated content"
        );

        Ok(Generation {
            text,
            usage: response.usage_metadata,
        })
    }
}

/// Reduce an upstream error body to its `error.message`, falling back to the raw text
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "empty error body".to_string(),
        _ => body.to_string(),
    }
}
