//! Interactive chat command.

use crate::agent::{Conversation, MoviesBuddy};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{resolve_api_key, Settings};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Agent) {
        Output::error(&format!("{}", e));
        Output::info("Run 'movies-buddy doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let api_key = resolve_api_key()?;
    let spinner = Output::spinner("Starting agent...");
    let buddy = MoviesBuddy::start(&settings, &api_key).await;
    spinner.finish_and_clear();
    let buddy = buddy?;

    println!("\n{}", style("🎬 Movies Buddy Chat 🎬").bold().cyan());
    println!(
        "{}\n",
        style("Ask about movies or TV series, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let result = chat_loop(&buddy, &settings).await;
    buddy.shutdown().await;
    result
}

async fn chat_loop(buddy: &MoviesBuddy, settings: &Settings) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut history: Conversation = Vec::new();
    let timeout = Some(settings.agent.run_timeout());

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            history.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let outcome = buddy.turn(&history, input, timeout).await;
        spinner.finish_and_clear();

        for call in &outcome.tool_calls {
            println!("{}", style(format!("  [{}]", call.name)).dim());
        }
        println!(
            "\n{} {}\n",
            style(format!("{}:", buddy.agent().name())).cyan().bold(),
            outcome.final_output
        );
        history = outcome.conversation;
    }

    Ok(())
}
