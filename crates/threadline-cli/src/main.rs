use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod collaborators;
mod commands;
mod script;

#[derive(Parser)]
#[command(name = "threadline")]
#[command(about = "Threadline CLI - replay conversation timeline sessions", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/threadline/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session and print the rendered timeline as JSON
    Replay {
        /// Replay script (TOML)
        script: PathBuf,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries JSON, logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Replay { script } => commands::replay::execute(&script, config).await?,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config::show(config)?,
            ConfigAction::Init { force } => commands::config::init(config, force)?,
        },
    }

    Ok(())
}
