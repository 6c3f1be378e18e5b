//! Ask command: one agent turn for one question.

use crate::agent::run_movies_buddy_agent;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::MoviesBuddyError;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::warn;

/// Run the ask command.
pub async fn run_ask(query: Option<String>, timeout: Option<u64>, settings: Settings) -> Result<()> {
    println!("\n🎬 Movies Buddy Agent 🎬");
    Output::rule();

    let query = match query {
        Some(q) => q.trim().to_string(),
        None => prompt_query()?,
    };

    if query.is_empty() {
        println!("No query provided. Exiting.");
        return Ok(());
    }

    println!("\nProcessing: {}\n", query);

    let timeout = timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.agent.run_timeout());

    let spinner = Output::spinner("Agent working...");
    let result = run_movies_buddy_agent(&settings, &query, &[], Some(timeout)).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(MoviesBuddyError::MissingApiKey(msg)) => {
            Output::error(&format!("Configuration error: {}", msg));
            println!("Set GEMINI_API_KEY and TVDB credentials in your .env before running the agent.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let final_output = outcome.final_output.trim();
    if final_output.is_empty() {
        warn!("Agent run produced no final output");
        println!("No agent response captured.");
        return Ok(());
    }

    Output::agent_response(final_output);

    if !outcome.tool_calls.is_empty() {
        Output::info(&format!("Tool calls ({}):", outcome.tool_calls.len()));
        for call in &outcome.tool_calls {
            Output::kv(&call.name, &super::truncate(&call.arguments, 60));
        }
    }

    Ok(())
}

fn prompt_query() -> Result<String> {
    print!("Enter your question about movies or TV series: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
