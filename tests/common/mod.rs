#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use token_counter::{
    config::TokenCounting,
    handlers::AppState,
    models::gemini::UsageMetadata,
    pricing::{CostCalculator, PricingEntry, PricingTable},
    providers::{Generation, ModelProvider, ProviderError, TurnRole},
    server,
};

/// Which provider call a scripted failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Every,
    InputCount,
    Generate,
    OutputCount,
}

impl FailAt {
    fn count(self, role: TurnRole) -> bool {
        match self {
            FailAt::Every => true,
            FailAt::InputCount => role == TurnRole::User,
            FailAt::OutputCount => role == TurnRole::Model,
            FailAt::Generate => false,
        }
    }

    fn generate(self) -> bool {
        matches!(self, FailAt::Every | FailAt::Generate)
    }
}

/// Provider returning fixed counts and text, recording every call
pub struct ScriptedProvider {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub text: String,
    pub usage: Option<UsageMetadata>,
    pub failure: Option<(FailAt, fn() -> ProviderError)>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(model: &str, input_tokens: u64, text: &str, output_tokens: u64) -> Self {
        Self {
            model: model.to_string(),
            input_tokens,
            output_tokens,
            text: text.to_string(),
            usage: None,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(model: &str, failure: fn() -> ProviderError) -> Self {
        Self::new(model, 0, "", 0).fail_at(FailAt::Every, failure)
    }

    /// Fail only the given call; every other call succeeds with the scripted values
    pub fn fail_at(mut self, at: FailAt, failure: fn() -> ProviderError) -> Self {
        self.failure = Some((at, failure));
        self
    }

    pub fn with_usage(mut self, usage: UsageMetadata) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn count_tokens(&self, role: TurnRole, text: &str) -> Result<u64, ProviderError> {
        self.record(format!("count:{}:{}", role, text));
        if let Some((at, failure)) = self.failure {
            if at.count(role) {
                return Err(failure());
            }
        }
        Ok(match role {
            TurnRole::User => self.input_tokens,
            TurnRole::Model => self.output_tokens,
        })
    }

    async fn generate_content(&self, prompt: &str) -> Result<Generation, ProviderError> {
        self.record(format!("generate:{}", prompt));
        if let Some((at, failure)) = self.failure {
            if at.generate() {
                return Err(failure());
            }
        }
        Ok(Generation {
            text: self.text.clone(),
            usage: self.usage,
        })
    }
}

pub fn flash_pricing() -> PricingTable {
    PricingTable::new(
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        vec![PricingEntry::new("gemini-1.5-flash", 0.000018, 0.000036)],
    )
}

pub fn state(provider: Arc<ScriptedProvider>, token_counting: TokenCounting) -> AppState {
    AppState {
        provider,
        calculator: CostCalculator::new(Arc::new(flash_pricing())),
        token_counting,
    }
}

pub fn app(provider: Arc<ScriptedProvider>) -> Router {
    app_with(provider, TokenCounting::CountTokens)
}

pub fn app_with(provider: Arc<ScriptedProvider>, token_counting: TokenCounting) -> Router {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    server::create_router(state(provider, token_counting), Arc::new(recorder.handle()))
}
