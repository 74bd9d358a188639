use crate::models::api::{ErrorBody, PricingResponse, PromptRequest, PromptResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Failure calling a token-counter server
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{} ({status}{})", .body.error, retry_hint(.body.retryable))]
    Api { status: StatusCode, body: ErrorBody },
}

fn retry_hint(retryable: bool) -> &'static str {
    if retryable {
        ", retryable"
    } else {
        ""
    }
}

/// HTTP client for the `/api` endpoints
#[derive(Debug, Clone)]
pub struct PromptClient {
    http: Client,
    base_url: String,
}

impl PromptClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `POST /api/prompt`
    pub async fn send_prompt(&self, prompt: &str) -> Result<PromptResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/prompt", self.base_url))
            .json(&PromptRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await?;

        decode(response).await
    }

    /// `GET /api/pricing`
    pub async fn pricing(&self) -> Result<PricingResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/pricing", self.base_url))
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
        error: if text.is_empty() { status.to_string() } else { text },
        kind: "unknown".to_string(),
        retryable: status.is_server_error(),
    });

    Err(ClientError::Api { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: "Provider error: provider request timed out after 60s".to_string(),
                kind: "provider_transient".to_string(),
                retryable: true,
            },
        };
        assert_eq!(
            error.to_string(),
            "Provider error: provider request timed out after 60s (500 Internal Server Error, retryable)"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = PromptClient::new("http://localhost:5050/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:5050");
    }
}
