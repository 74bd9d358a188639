use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use token_counter::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Start => {
            // Tracing follows the configured level/format, so load config first
            let cfg = config::load_config(&args.config)?;
            init_tracing(&cfg.server.log_level, &cfg.server.log_format);
            commands::start::execute(cfg).await?;
        }
        cli::Commands::Test => {
            init_tracing("warn", "text");
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => {
                init_tracing("warn", "text");
                commands::config::show(&args.config)?;
            }
        },
        cli::Commands::Pricing => {
            init_tracing("warn", "text");
            commands::pricing::execute(&args.config)?;
        }
        cli::Commands::Chat { url, timeout } => {
            init_tracing("warn", "text");
            commands::chat::execute(&url, timeout).await?;
        }
        cli::Commands::Version => {
            println!("Token Counter v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
