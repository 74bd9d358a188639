use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use token_counter::{
    client::PromptClient,
    conversation::{ChatSession, Role, SubmitError, UsageTotals},
};

/// Execute the chat command
///
/// Reads prompts from stdin, one per line. `/clear`, `/totals`, `/history`
/// and `/quit` are handled locally.
pub async fn execute(url: &str, timeout: u64) -> Result<()> {
    let client = PromptClient::new(url, Duration::from_secs(timeout))?;
    let mut session = ChatSession::new();

    match client.pricing().await {
        Ok(pricing) => println!(
            "{} {} {}",
            "Connected to".green(),
            url,
            format!("(model {}, rates as of {})", pricing.model, pricing.effective_date).dimmed()
        ),
        Err(e) => println!("{} {}", "⚠ Could not reach server:".yellow(), e),
    }
    println!("{}", "Commands: /clear /totals /history /quit".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{}", "History cleared".dimmed());
                print_totals(&session.totals());
                continue;
            }
            "/totals" => {
                print_totals(&session.totals());
                continue;
            }
            "/history" => {
                print_history(&session);
                continue;
            }
            _ => {}
        }

        let prompt = match session.begin_submit(&line) {
            Ok(prompt) => prompt,
            Err(SubmitError::EmptyPrompt) => continue,
            Err(e) => {
                println!("{} {}", "⚠".yellow(), e);
                continue;
            }
        };

        println!("{}", "thinking...".dimmed());
        let result = client.send_prompt(&prompt).await;
        session.finish(result);

        if let Some(error) = session.last_error() {
            println!("{} {}", "✗ Request failed:".red().bold(), error);
            session.dismiss_error();
            continue;
        }

        if let Some(reply) = session.history().messages().last() {
            println!("{}", reply.content);
            if let (Some(input), Some(output), Some(cost)) =
                (reply.input_tokens, reply.output_tokens, reply.cost.as_ref())
            {
                println!(
                    "{}",
                    format!(
                        "  in {} · out {} · ${} {}",
                        input, output, cost.total_cost, cost.currency
                    )
                    .dimmed()
                );
            }
        }
    }

    println!();
    print_totals(&session.totals());
    Ok(())
}

fn print_totals(totals: &UsageTotals) {
    println!("{}", "Total Usage".bold());
    println!("  Input Tokens:  {}", totals.input_tokens);
    println!("  Output Tokens: {}", totals.output_tokens);
    println!("  Total Cost:    ${}", totals.total_cost);
}

fn print_history(session: &ChatSession) {
    if session.history().is_empty() {
        println!("{}", "No messages yet".dimmed());
        return;
    }

    for message in session.history().messages() {
        match message.role {
            Role::User => println!("{} {}", "you:".cyan().bold(), message.content),
            Role::Assistant => println!("{} {}", "ai: ".green().bold(), message.content),
        }
    }
}
