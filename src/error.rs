use crate::{models::api::ErrorBody, providers::ProviderError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed client input
    InvalidRequest(String),
    /// Model provider call failed
    Provider(ProviderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Provider(err) => write!(f, "Provider error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::InvalidRequest(_) => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // Provider failures keep the 500 contract; `kind` and `retryable` carry the detail
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_retryable(),
            Self::InvalidRequest(_) => false,
        }
    }

    /// Machine-readable error kind reported in the response body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Provider(err) => err.kind(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
            retryable: self.is_retryable(),
        });

        (self.status(), body).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_display() {
        let error = AppError::InvalidRequest("prompt must not be empty".to_string());
        assert_eq!(error.to_string(), "Invalid request: prompt must not be empty");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(AppError::InvalidRequest("x".to_string()).kind(), "invalid_request");
        assert_eq!(
            AppError::Provider(ProviderError::Timeout(Duration::from_secs(1))).kind(),
            "provider_transient"
        );
        assert_eq!(
            AppError::Provider(ProviderError::MalformedResponse("x".to_string())).kind(),
            "provider_terminal"
        );
    }

    #[tokio::test]
    async fn test_invalid_request_response() {
        let response = AppError::InvalidRequest("missing prompt".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_error_response() {
        let error = AppError::Provider(ProviderError::Connection("refused".to_string()));
        assert!(error.is_retryable());
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
