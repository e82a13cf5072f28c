use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use digiskill::{AppConfig, api, build_engine};

mod ui;

#[derive(Parser)]
#[command(name = "digiskill")]
#[command(about = "Digital skills assessment API with a knowledge-base chatbot", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Address to bind, overrides DIGISKILL_HOST
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides DIGISKILL_PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask the knowledge-base chatbot questions in the terminal
    Ask,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("digiskill=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            tracing::info!("Starting Digital Skills Assessment API v{}", env!("CARGO_PKG_VERSION"));
            api::serve(config).await
        }
        Commands::Ask => ask(config).await,
    }
}

async fn ask(config: AppConfig) -> Result<()> {
    println!("{} Building the knowledge base from {}...", "🔄".blue(), config.rag.knowledge_file.display());
    let engine = build_engine(&config.rag, &config.ollama)
        .await
        .context("RAG bot initialization failed")?;

    ui::display_banner(&config.ollama.model);

    let mut history = Vec::new();
    loop {
        let Some(input) = ui::read_input_with_history(&mut history)? else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "help" => {
                ui::print_help();
                continue;
            }
            _ => {}
        }

        println!("{} Thinking...", "🤖".blue());
        match engine.answer(&input).await {
            Ok(answer) => println!("{} {}\n", "Bot:".cyan().bold(), answer),
            Err(e) => println!("{} {}\n", "❌".red(), e),
        }
    }

    println!("{}", "👋 Goodbye!".green());
    Ok(())
}
