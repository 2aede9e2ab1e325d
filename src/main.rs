//! AI Code Assistant - terminal client for a remote workspace and its assistant
//!
//! Run with `ai-code-assistant` or `ai-code-assistant --help` for usage.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_code_assistant::{
    api::{ChatService, HttpClient, WorkspaceService},
    chat::SessionId,
    config::Config,
    tui::App,
    APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Browse a remote workspace and chat with an AI code assistant")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive TUI (default)
    Tui,

    /// List a workspace directory
    Ls {
        /// Workspace-relative directory
        #[arg(default_value = ".")]
        path: String,
    },

    /// Print a workspace file
    Cat {
        /// Workspace-relative file path
        path: String,
    },

    /// Ask the assistant a single question
    Ask {
        /// Message to send
        message: String,

        /// Keep the conversation on the server and print its id
        #[arg(short, long)]
        keep: bool,
    },

    /// Print the server-side history of a conversation
    History {
        /// Conversation id (session-<uuid>)
        session_id: String,
    },

    /// Check that the backend is reachable
    Ping,

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, to_file: Option<PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for the HTTP stack
        EnvFilter::new("info")
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?)
    };

    if let Some(path) = to_file {
        // Log to file when running TUI (so logs don't interfere with display)
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if cli.debug {
        config.debug = true;
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config(&cli);
    config.validate()?;

    match cli.command {
        None | Some(Commands::Tui) => {
            // Setup logging to file for TUI mode
            setup_logging(config.debug, Some(config.log_file_path()))?;

            info!("Starting AI Code Assistant TUI v{}", VERSION);
            info!("Backend: {}", config.server_url);

            let mut app = App::new(config)?;
            app.run().await?;

            info!("Exited cleanly");
        }

        Some(Commands::Ls { path }) => {
            setup_logging(config.debug, None)?;
            let client = HttpClient::from_config(&config)?;

            let items = client.list_directory(&path).await?;
            if items.is_empty() {
                println!("No files found");
            }
            for item in items {
                if item.is_dir() {
                    println!("📁 {}/", item.path);
                } else {
                    println!("📄 {}", item.path);
                }
            }
        }

        Some(Commands::Cat { path }) => {
            setup_logging(config.debug, None)?;
            let client = HttpClient::from_config(&config)?;

            let content = client.read_file(&path).await?;
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }

        Some(Commands::Ask { message, keep }) => {
            setup_logging(config.debug, None)?;
            let client = HttpClient::from_config(&config)?;
            let session_id = SessionId::new();

            let reply = client.send_turn(&session_id, &message).await;

            if keep {
                eprintln!("Session: {}", session_id);
            } else if let Err(e) = client.delete_conversation(&session_id).await {
                warn!("Failed to delete conversation {}: {}", session_id, e);
            }

            println!("{}", reply?);
        }

        Some(Commands::History { session_id }) => {
            setup_logging(config.debug, None)?;
            let client = HttpClient::from_config(&config)?;

            let messages = client.history(&session_id).await?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }

        Some(Commands::Ping) => {
            setup_logging(config.debug, None)?;
            let client = HttpClient::from_config(&config)?;

            let message = client.health().await?;
            println!("{} is up: {}", client.base_url(), message);
        }

        Some(Commands::Config { init }) => {
            setup_logging(config.debug, None)?;

            if init {
                let path = config.save()?;
                println!("Configuration initialized at {:?}", path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
                println!("Log file: {:?}", config.log_file_path());
            }
        }
    }

    Ok(())
}
