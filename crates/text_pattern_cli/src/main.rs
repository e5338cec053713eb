use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod errors;

use commands::{InspectArgs, ResolveArgs, ValidateArgs};
use config::{AppConfig, DEFAULT_CONFIG_FILENAME, LOG_ENV_VAR};

/// text-pattern CLI: generate and check identifiers from text patterns
#[derive(Parser)]
#[command(name = "text-pattern")]
#[command(about = "Generate and validate identifiers from text patterns", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a template into a concrete value
    Resolve(ResolveArgs),

    /// Check whether a text matches a template
    Validate(ValidateArgs),

    /// List the values a template requires
    Inspect(InspectArgs),

    /// Write a default configuration file
    Init,

    /// Show the CLI version
    Version,
}

/// Loads configuration and initialises logging, exiting on a bad config file.
fn initialize(config_path: Option<&Path>) -> AppConfig {
    let config = match AppConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    config
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Resolve(args) => {
            let config = initialize(cli.config.as_deref());
            match commands::resolve(args, &config).await {
                Ok(value) => println!("{value}"),
                Err(e) => {
                    error!("Error: {e}");
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
        Commands::Validate(args) => {
            initialize(cli.config.as_deref());
            match commands::validate(args) {
                Ok(true) => println!("valid"),
                Ok(false) => {
                    println!("invalid");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
        Commands::Inspect(args) => {
            initialize(cli.config.as_deref());
            match commands::inspect(args) {
                Ok(summary) => println!("{summary}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
        Commands::Init => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
            if let Err(e) = AppConfig::default().save(&path) {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
            println!("Wrote {}", path.display());
        }
        Commands::Version => {
            println!("text-pattern version {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
