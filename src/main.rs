//! Wooting Analog CLI
//!
//! Command-line access to analog keyboards through the native wrapper library.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use wooting_analog::{decode_status, AnalogConfig, AnalogResult};

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config, command-line flags take precedence
    let config_path = cli.config.clone().unwrap_or_else(AnalogConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = AnalogConfig::load(&config_path)?;
    if let Some(library) = cli.library.clone() {
        config.library_path = Some(library);
    }
    if let Some(mode) = cli.mode {
        config.keycode_mode = mode;
    }

    if let Some(Commands::SaveConfig) = cli.command {
        config.save(&config_path)?;
        println!("Saved config to {}", config_path.display());
        return Ok(());
    }

    let session = commands::open_session(&config, cli.mock)?;

    let result = match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => commands::query::status(&session, &config),
        Commands::Devices { json } => commands::query::devices(&session, &config, json),
        Commands::Read { key, device } => commands::read::read(&session, &config, &key, device),
        Commands::Watch { device, interval } => {
            commands::read::watch(&session, &config, device, interval).await
        }
        Commands::Events => commands::events::events(&session).await,
        Commands::SaveConfig => Ok(()),
    };

    let status = session.analog.uninitialise();
    match AnalogResult::from_code(status) {
        Some(result) if result.is_ok() => {}
        Some(result) => warn!(
            "uninitialise returned {} ({}): {}",
            result.name(),
            status,
            result.message()
        ),
        None => warn!("uninitialise returned {}: {}", status, decode_status(status)),
    }

    result
}
