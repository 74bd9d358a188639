use crate::pricing::{table, PricingEntry, PricingTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// How token counts are obtained from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCounting {
    /// Dedicated countTokens calls for the prompt and the generated text
    #[default]
    CountTokens,
    /// Usage metadata returned with the generation, with countTokens as fallback
    UsageMetadata,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub token_counting: TokenCounting,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: 60,
            token_counting: TokenCounting::default(),
        }
    }
}

/// Versioned rate card
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub effective_date: NaiveDate,
    pub models: Vec<PricingEntry>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            effective_date: table::builtin_effective_date(),
            models: table::builtin_entries(),
        }
    }
}

impl PricingConfig {
    pub fn to_table(&self) -> PricingTable {
        PricingTable::new(self.effective_date, self.models.iter().cloned())
    }
}

/// Load and validate configuration
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let cfg = read_config(path)?;
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Read configuration from `path` (optional), `TOKEN_COUNTER__*` variables and
/// the `GEMINI_API_KEY` / `GEMINI_MODEL` / `PORT` overrides, without validating it
pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("TOKEN_COUNTER").separator("__"))
        .set_override_option("provider.api_key", std::env::var("GEMINI_API_KEY").ok())?
        .set_override_option("provider.model", std::env::var("GEMINI_MODEL").ok())?
        .set_override_option("server.port", std::env::var("PORT").ok())?
        .build()?;

    Ok(config.try_deserialize()?)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.provider.api_key.trim().is_empty() {
        anyhow::bail!("Provider API key must be configured (set GEMINI_API_KEY)");
    }

    if cfg.provider.model.trim().is_empty() {
        anyhow::bail!("Provider model cannot be empty");
    }

    if cfg.provider.timeout_seconds == 0 {
        anyhow::bail!("Provider timeout_seconds must be greater than zero");
    }

    let mut seen = HashSet::new();
    for entry in &cfg.pricing.models {
        if entry.model_id.trim().is_empty() {
            anyhow::bail!("Pricing entry model_id cannot be empty");
        }
        if !seen.insert(entry.model_id.as_str()) {
            anyhow::bail!("Duplicate pricing entry for model '{}'", entry.model_id);
        }
        for (label, rate) in [("input_per_1k", entry.input_per_1k), ("output_per_1k", entry.output_per_1k)] {
            if !rate.is_finite() || rate < 0.0 {
                anyhow::bail!(
                    "Pricing entry '{}' has invalid {}: {}",
                    entry.model_id,
                    label,
                    rate
                );
            }
        }
    }

    if !seen.contains(cfg.provider.model.as_str()) {
        tracing::warn!(
            model = %cfg.provider.model,
            "Configured model has no pricing entry, costs will be reported as zero"
        );
    }

    Ok(())
}
