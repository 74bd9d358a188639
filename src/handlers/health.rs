use crate::handlers::prompt::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "token-counter",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
///
/// Reports the provider model and whether it has a pricing entry. Provider
/// connectivity is not probed since every probe would be a billable call.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.provider.model();
    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "token-counter",
        "model": model,
        "priced": state.calculator.table().contains(model),
    })))
}
