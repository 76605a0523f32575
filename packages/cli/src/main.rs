//! Interactive Mercari shopping assistant.
//!
//! Reads `.env` for credentials, then runs a REPL: each line is one
//! conversation turn. `reset` clears history, `quit` exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent::{Conversation, ShoppingAgent};
use marketplace::{MercariSource, MercariSourceConfig, RateLimitedSource};
use openai_client::OpenAIClient;

const DEFAULT_MODEL: &str = "gpt-4.1";

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; the environment itself may carry the key.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,agent=info,marketplace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let client = OpenAIClient::from_env().context(
        "no API credentials found; set OPENAI_API_KEY, or GITHUB_TOKEN for GitHub Models",
    )?;
    let model =
        std::env::var("MERCARI_AGENT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let source = RateLimitedSource::new(
        MercariSource::new(MercariSourceConfig::default())
            .context("failed to build listing source")?,
    );
    let shopping_agent = ShoppingAgent::new(client, model.clone(), Arc::new(source));

    println!("{}", style("Mercari Japan AI Shopping Agent").bold());
    println!(
        "Model: {}. Tell me what you're looking for and I'll search and recommend.",
        style(&model).cyan()
    );
    println!("Type 'quit' to exit, 'reset' to start a new conversation.\n");

    let mut history = Conversation::new();

    loop {
        let line: String = match Input::new().with_prompt("You").interact_text() {
            Ok(line) => line,
            // EOF / interrupted terminal: exit cleanly.
            Err(_) => break,
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        match input.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "reset" => {
                history = Conversation::new();
                println!("{}\n", style("Conversation reset.").dim());
                continue;
            }
            _ => {}
        }

        match shopping_agent.run_turn(input, &history).await {
            Ok(outcome) => {
                println!("\n{} {}\n", style("Agent:").green().bold(), outcome.reply);
                history = outcome.history;
            }
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                let hint = match &e {
                    agent::AgentError::Oracle(oracle) if oracle.is_retryable() => {
                        "the model endpoint is busy, please try again in a moment"
                    }
                    _ => "something went wrong talking to the model, please try again",
                };
                println!("\n{} {}\n", style("Error:").red().bold(), hint);
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
