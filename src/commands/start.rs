use anyhow::Result;
use colored::Colorize;
use token_counter::{config::Config, server};
use tracing::info;

/// Execute the start command
///
/// Configuration is already loaded and validated; this blocks until shutdown.
pub async fn execute(cfg: Config) -> Result<()> {
    println!("{}", "Starting token counter...".green());
    println!(
        "  {}: http://{}:{}",
        "UI".cyan(),
        cfg.server.host,
        cfg.server.port
    );

    info!(model = %cfg.provider.model, "Starting token counter in foreground mode");

    server::start_server(cfg).await?;

    Ok(())
}
