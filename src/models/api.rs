use crate::pricing::CostBreakdown;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/prompt`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Successful response of `POST /api/prompt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub response: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub cost: CostBreakdown,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
    pub retryable: bool,
}

/// Body of `GET /api/pricing`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub model: String,
    pub effective_date: String,
    pub currency: String,
    pub models: Vec<PricingModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingModel {
    pub model_id: String,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}
