pub mod gemini;

use crate::models::gemini::UsageMetadata;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

pub use gemini::GeminiClient;

/// Speaker of a message submitted for token counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated completion plus whatever usage the provider reported alongside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: Option<UsageMetadata>,
}

/// Hosted model API consumed by the prompt handler.
///
/// Implementations own their credentials, model selection and timeouts;
/// the handler only sees token counts and generated text.
#[async_trait]
pub trait ModelProvider: Send + Sync + 'static {
    /// Model identifier used for pricing lookups
    fn model(&self) -> &str;

    /// Count tokens in `text` submitted as a single message from `role`
    async fn count_tokens(&self, role: TurnRole, text: &str) -> Result<u64, ProviderError>;

    /// Generate a completion for `prompt`
    async fn generate_content(&self, prompt: &str) -> Result<Generation, ProviderError>;
}

/// Failure talking to the model provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to reach provider: {0}")]
    Connection(String),
    #[error("provider returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether repeating the same call later could succeed
    ///
    /// Transient: timeouts, connection failures, HTTP 429 and 5xx.
    /// Everything else (bad key, bad request, unparsable body) is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Connection(_) => true,
            ProviderError::Upstream { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ProviderError::MalformedResponse(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        if self.is_retryable() {
            "provider_transient"
        } else {
            "provider_terminal"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: StatusCode) -> ProviderError {
        ProviderError::Upstream {
            status,
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert!(upstream(status).is_retryable(), "{status} should be retryable");
        }
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        let error = upstream(StatusCode::TOO_MANY_REQUESTS);
        assert!(error.is_retryable());
        assert_eq!(error.kind(), "provider_transient");
    }

    #[test]
    fn test_client_errors_are_terminal() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            let error = upstream(status);
            assert!(!error.is_retryable(), "{status} should be terminal");
            assert_eq!(error.kind(), "provider_terminal");
        }
    }

    #[test]
    fn test_transport_failures() {
        assert!(ProviderError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(ProviderError::Connection("refused".to_string()).is_retryable());
        assert!(!ProviderError::MalformedResponse("no candidates".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let error = upstream(StatusCode::UNAUTHORIZED);
        assert_eq!(error.to_string(), "provider returned 401 Unauthorized: test");
    }
}
