//! `shellwright chat` — Interactive or single-message chat mode.

use shellwright_agent::{Agent, AgentTurnResult};
use shellwright_config::AppConfig;
use shellwright_core::Error;
use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};

const PROMPT: &str = "  You > ";

/// Inputs that end the interactive session.
fn is_exit_command(line: &str) -> bool {
    matches!(
        line.to_lowercase().as_str(),
        "exit" | "quit" | "bye" | "/exit" | "/quit" | ":q"
    )
}

/// Prefix every line of the rendered turn so replies stand out from input.
fn format_reply(result: &AgentTurnResult) -> String {
    result
        .render()
        .lines()
        .map(|line| format!("  Assistant > {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve `work`, or `None` if `interrupt` completes first.
async fn unless_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = ()>,
) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        () = interrupt => None,
    }
}

/// The first call replaces the default SIGINT exit for the rest of the
/// process.
async fn ctrl_c() {
    let _ = tokio::signal::ctrl_c().await;
}

fn print_missing_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    OPENROUTER_API_KEY  = 'sk-or-v1-...'   (recommended)");
    eprintln!("    SHELLWRIGHT_API_KEY = 'sk-...'         (any OpenAI-compatible endpoint)");
    eprintln!();
    eprintln!("  Or run `shellwright onboard`, or add it to:");
    eprintln!("    {}", AppConfig::config_path().display());
    eprintln!();
    eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
    eprintln!();
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    let mut agent = match Agent::from_config(&config) {
        Ok(agent) => agent,
        Err(Error::CredentialMissing) => {
            print_missing_key_help();
            return Err("No API key found. See above for setup instructions.".into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let result = agent.handle_turn(&msg).await;
        eprint!("\r              \r");
        println!("{}", result?.render());
        return Ok(());
    }

    let workspace = config
        .workspace_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║       shellwright — Interactive Mode          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", agent.provider_name());
    println!("  Model:     {}", agent.model());
    println!("  Workspace: {}", workspace.display());
    println!();
    println!("  ⚠️  Files and `$SHELL:` commands in replies run unsandboxed,");
    println!("     with your permissions, without confirmation.");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        // EOF (Ctrl+D) or Ctrl+C
        let Some(Some(line)) = unless_interrupted(lines.next_line(), ctrl_c())
            .await
            .transpose()?
        else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            break;
        }

        eprint!("  ...");
        let outcome = unless_interrupted(agent.handle_turn(line), ctrl_c()).await;
        eprint!("\r     \r");

        let Some(outcome) = outcome else {
            eprintln!("  [Interrupted] turn abandoned");
            break;
        };

        match outcome {
            Ok(result) => {
                println!();
                println!("{}", format_reply(&result));
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
