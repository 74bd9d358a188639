use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use token_counter::config::{self, Config};
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::read_config(path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    if let Err(e) = config::validate_config(&cfg) {
        println!("{} {}", "⚠ Configuration is not valid:".red(), e);
    }

    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.provider.api_key = mask_api_key(&cfg.provider.api_key);
    sanitized
}

/// Mask an API key for safe display
///
/// Shows first 7 and last 4 characters with dots in between
/// Example: "AIzaSyA1234567890abcdef" -> "AIzaSyA...cdef"
fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        // Too short to mask meaningfully
        return "***".to_string();
    }

    let prefix: String = chars[..7].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();

    format!("{}...{}", prefix, suffix)
}
