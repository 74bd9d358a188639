use crate::{
    config::TokenCounting,
    error::AppError,
    metrics,
    models::api::{PromptRequest, PromptResponse},
    pricing::CostCalculator,
    providers::{Generation, ModelProvider, ProviderError, TurnRole},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Application state
///
/// Nothing here is mutated after startup, so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ModelProvider>,
    pub calculator: CostCalculator,
    pub token_counting: TokenCounting,
}

/// Handle `POST /api/prompt`
///
/// Dropping the returned future (client disconnect) drops every in-flight provider call.
pub async fn handle_prompt(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, AppError> {
    let model = state.provider.model().to_string();
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("prompt", request_id = %request_id, model = %model);

    async move {
        let start = Instant::now();

        let result = match validate(payload) {
            Ok(prompt) => process_prompt(&state, &prompt).await,
            Err(e) => Err(e),
        };

        metrics::record_duration(&model, start.elapsed());

        match result {
            Ok(response) => {
                metrics::record_request(&model, "success");
                metrics::record_tokens(&model, "input", response.input_tokens);
                metrics::record_tokens(&model, "output", response.output_tokens);
                metrics::record_cost(&model, response.cost.total_cost.micros());

                tracing::info!(
                    duration_ms = start.elapsed().as_millis(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    total_cost = %response.cost.total_cost,
                    "Completed prompt request"
                );
                Ok(Json(response))
            }
            Err(e) => {
                metrics::record_request(&model, "error");
                metrics::record_error(e.kind());

                match &e {
                    AppError::InvalidRequest(_) => {
                        tracing::warn!(error = %e, "Rejected prompt request");
                    }
                    _ => {
                        tracing::error!(
                            error = %e,
                            kind = e.kind(),
                            retryable = e.is_retryable(),
                            "Prompt request failed"
                        );
                    }
                }
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Reject bad input before any provider call is made
fn validate(payload: Result<Json<PromptRequest>, JsonRejection>) -> Result<String, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    if request.prompt.trim().is_empty() {
        return Err(AppError::InvalidRequest("prompt must not be empty".to_string()));
    }

    Ok(request.prompt)
}

/// Count input, generate, count output, then price the exchange
///
/// Input counting and generation both depend only on the prompt and run
/// concurrently; output counting needs the generated text.
pub async fn process_prompt(state: &AppState, prompt: &str) -> Result<PromptResponse, AppError> {
    tracing::info!(prompt_chars = prompt.chars().count(), "Prompt received");

    let provider = state.provider.as_ref();

    let (input_tokens, generation) = match state.token_counting {
        TokenCounting::CountTokens => {
            let (input_tokens, generation) = tokio::try_join!(
                provider.count_tokens(TurnRole::User, prompt),
                provider.generate_content(prompt),
            )?;
            (input_tokens, generation)
        }
        TokenCounting::UsageMetadata => {
            let generation = provider.generate_content(prompt).await?;
            let input_tokens = match generation.usage.and_then(|u| u.prompt_token_count) {
                Some(count) => count,
                None => provider.count_tokens(TurnRole::User, prompt).await?,
            };
            (input_tokens, generation)
        }
    };

    let output_tokens = output_token_count(state, provider, &generation).await?;

    let cost = state
        .calculator
        .calculate_cost(provider.model(), input_tokens, output_tokens);

    Ok(PromptResponse {
        response: generation.text,
        input_tokens,
        output_tokens,
        total_tokens: input_tokens + output_tokens,
        cost,
    })
}

async fn output_token_count(
    state: &AppState,
    provider: &dyn ModelProvider,
    generation: &Generation,
) -> Result<u64, ProviderError> {
    if state.token_counting == TokenCounting::UsageMetadata {
        if let Some(count) = generation.usage.and_then(|u| u.candidates_token_count) {
            return Ok(count);
        }
        tracing::debug!("Usage metadata missing candidate count, counting output tokens");
    }

    provider.count_tokens(TurnRole::Model, &generation.text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_prompt() {
        let payload = Ok(Json(PromptRequest {
            prompt: "   \n".to_string(),
        }));
        assert!(matches!(validate(payload), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_keeps_prompt_verbatim() {
        let payload = Ok(Json(PromptRequest {
            prompt: "  Hello  ".to_string(),
        }));
        assert_eq!(validate(payload).unwrap(), "  Hello  ");
    }
}
