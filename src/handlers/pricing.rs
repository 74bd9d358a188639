use crate::{
    handlers::prompt::AppState,
    models::api::{PricingModel, PricingResponse},
    pricing::CURRENCY,
};
use axum::{extract::State, Json};

/// Handle `GET /api/pricing`
/// Returns the selected model and the rate card it is billed against
pub async fn get_pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    let table = state.calculator.table();

    Json(PricingResponse {
        model: state.provider.model().to_string(),
        effective_date: table.effective_date().to_string(),
        currency: CURRENCY.to_string(),
        models: table
            .entries()
            .into_iter()
            .map(|entry| PricingModel {
                model_id: entry.model_id.clone(),
                input_per_1k: entry.input_per_1k,
                output_per_1k: entry.output_per_1k,
            })
            .collect(),
    })
}
