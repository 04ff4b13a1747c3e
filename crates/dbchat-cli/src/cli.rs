//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

use dbchat_api::ApiClient;
use dbchat_core::config::Config;
use dbchat_core::logging;

#[derive(Parser)]
#[command(name = "dbchat")]
#[command(version)]
#[command(about = "Terminal client for the dbchat assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the streaming API base URL from config
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Override the site base URL from config
    #[arg(long, value_name = "URL")]
    site_base: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Send one question through the atomic ask flow and print the answer
    Ask {
        /// The question to send
        #[arg(short, long)]
        question: String,

        /// Continue an existing thread by ID
        #[arg(long, value_name = "ID")]
        thread: Option<String>,
    },

    /// Manage saved threads
    Threads {
        #[command(subcommand)]
        command: ThreadCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ThreadCommands {
    /// List all threads
    List,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
}

/// Parses arguments and dispatches. Called from `main`.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(site_base) = cli.site_base {
        config.site_base = site_base;
    }

    // Logs go to a file; the terminal belongs to the TUI.
    let _guard = logging::init()?;
    tracing::info!(api_base = %config.api_base, "starting dbchat");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async move {
        match cli.command {
            None => dbchat_tui::run_chat(config).await,
            Some(Commands::Ask { question, thread }) => ask(&config, &question, thread).await,
            Some(Commands::Threads {
                command: ThreadCommands::List,
            }) => list_threads(&config).await,
            Some(Commands::Config {
                command: ConfigCommands::Path,
            }) => {
                println!("{}", dbchat_core::config::paths::config_path().display());
                Ok(())
            }
        }
    })
}

async fn ask(config: &Config, question: &str, thread: Option<String>) -> Result<()> {
    let client = ApiClient::new(config)?;
    let answer = client
        .ask(
            thread.as_deref(),
            question,
            serde_json::Value::Null,
            serde_json::Value::Null,
        )
        .await
        .context("Ask failed")?;
    println!("{}", answer.message.content);
    eprintln!("thread: {}", answer.thread_id);
    Ok(())
}

async fn list_threads(config: &Config) -> Result<()> {
    let client = ApiClient::new(config)?;
    let threads = client.list_threads().await.context("Could not load threads")?;
    if threads.is_empty() {
        println!("No threads.");
        return Ok(());
    }
    for thread in threads {
        println!(
            "{}  {}  {}",
            thread.id,
            thread.updated_at,
            thread.display_title()
        );
    }
    Ok(())
}
