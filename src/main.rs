use std::process::ExitCode;

use clap::Parser;
use faqrag::cli::*;
use faqrag::config::AppConfig;
use faqrag::config::CONFIG_PATH_ENV;
use faqrag::config::DEFAULT_CONFIG_FILE;
use faqrag::logging::init_logging;
use faqrag::Result;
use tracing::error;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            println!("\n💡 To fix this:");
            println!("  1. Copy config.example.toml to {DEFAULT_CONFIG_FILE} (or point {CONFIG_PATH_ENV} at a file)");
            println!("  2. Fill in the [database] section, or export DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD");
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = match init_logging(&config, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            print_failure(&e);
            return ExitCode::FAILURE;
        }
    };
    info!("Configuration loaded successfully");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            print_failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Init { skip_index } => handle_init_command(config, skip_index).await,
        Commands::Embed { input, output } => {
            handle_embed_command(config, &input, output.as_deref()).await
        }
        Commands::Ingest {
            input,
            dedup,
            dry_run,
        } => handle_ingest_command(config, &input, dedup, dry_run).await,
        Commands::Ask { question, json } => handle_ask_command(config, question, json).await,
        Commands::Stats => handle_stats_command(config).await,
        Commands::Config => handle_config_command(config),
    }
}
