use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use token_counter::config;
use tracing::info;

/// Execute the test command
///
/// This validates the configuration without starting the server
pub fn execute(path: &Path) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!("Loading and validating configuration");

    // Load configuration (this will validate it)
    let cfg = config::load_config(path)?;
    let table = cfg.pricing.to_table();

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!();

    println!("  {}: {}", "Model".cyan(), cfg.provider.model);
    println!("  {}: {}", "Base URL".cyan(), cfg.provider.base_url);
    println!("  {}: {}s", "Timeout".cyan(), cfg.provider.timeout_seconds);
    println!("  {}: {:?}", "Token Counting".cyan(), cfg.provider.token_counting);
    println!();

    println!(
        "  {}: {} models (effective {})",
        "Pricing".cyan(),
        table.len(),
        table.effective_date()
    );
    let priced = if table.contains(&cfg.provider.model) {
        "priced".green()
    } else {
        "not priced, costs will be zero".red()
    };
    println!("    {} → {}", cfg.provider.model, priced);

    info!("Configuration validation completed successfully");
    Ok(())
}
