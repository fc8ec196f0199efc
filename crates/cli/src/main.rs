//! AO Cook CLI — the main entry point.
//!
//! Commands:
//! - `serve`   — Start the HTTP gateway and chat UI
//! - `chat`    — Interactive or single-message chat
//! - `search`  — Search the documentation locally
//! - `tool`    — Invoke a documentation tool locally
//! - `onboard` — Write the default config file
//! - `doctor`  — Diagnose setup problems

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "aocook",
    about = "AO Cook — a documentation chatbot for the AO blockchain",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway and chat UI
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Search the documentation and print the ranked results
    Search {
        /// Search terms; every term must appear in a result
        query: String,

        /// Restrict to one top-level grouping
        #[arg(short, long, value_parser = ["concepts", "examples", "sections", "all"])]
        category: Option<String>,
    },

    /// Invoke a documentation tool and print its payload
    Tool {
        /// Tool name (searchDocs, getExample, explainConcept)
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose setup problems
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Search { query, category } => commands::search::run(&query, category.as_deref())?,
        Commands::Tool { name, args } => commands::tool::run(&name, &args).await?,
        Commands::Onboard => commands::onboard::run()?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
