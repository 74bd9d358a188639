use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use token_counter::config;

/// Execute the pricing command
///
/// Prints the configured rate card, marking the selected model
pub fn execute(path: &Path) -> Result<()> {
    let cfg = config::read_config(path)?;
    let table = cfg.pricing.to_table();

    println!(
        "{} (effective {}, USD per 1K tokens)",
        "Pricing Table".bold(),
        table.effective_date()
    );
    println!();
    println!("  {:<32} {:>14} {:>14}", "Model", "Input", "Output");

    for entry in table.entries() {
        let marker = if entry.model_id == cfg.provider.model { "*" } else { " " };
        println!(
            "{} {:<32} {:>14} {:>14}",
            marker.green(),
            entry.model_id,
            entry.input_per_1k.to_string(),
            entry.output_per_1k.to_string()
        );
    }

    if !table.contains(&cfg.provider.model) {
        println!();
        println!(
            "{}",
            format!(
                "Selected model '{}' has no entry; costs will be reported as zero",
                cfg.provider.model
            )
            .yellow()
        );
    }

    Ok(())
}
