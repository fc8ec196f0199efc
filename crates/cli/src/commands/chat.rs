//! `aocook chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use aocook_agent::ChatRelay;
use aocook_config::AppConfig;
use aocook_core::session::ChatSession;
use aocook_providers::OpenAiAssistants;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    // Fail early with setup instructions when no key is set
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    AOCOOK_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let backend = Arc::new(OpenAiAssistants::from_config(&config)?);
    let relay = ChatRelay::from_config(&config, backend);
    let mut session = ChatSession::new();

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let outcome = relay.send(&mut session, &msg).await;
        eprint!("\r              \r");
        println!("{}", outcome?.text());
        return Ok(());
    }

    println!();
    println!("  AO Cook — Interactive Mode");
    println!();
    println!("  Model:     {}", config.assistant.model);
    println!("  Docs:      {}", config.knowledge.path.display());
    println!("  Tools:     {}", relay.tools().names().join(", "));
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        match relay.send(&mut session, line).await {
            Ok(outcome) => {
                eprint!("\r     \r");
                println!();
                for reply_line in outcome.text().lines() {
                    println!("  AO Cook > {reply_line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
