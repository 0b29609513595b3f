//! Fleetdeck command-line interface.

mod client;
mod commands;
mod config;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::client::FleetClient;
use crate::commands::instance::InstanceCommands;
use crate::config::CliConfig;
use crate::output::{print_error, OutputFormat};

/// Fleetdeck fleet management CLI
#[derive(Parser)]
#[command(name = "fleetdeck", version, about)]
struct Cli {
    /// Daemon endpoint (overrides the config file)
    #[arg(long, env = "FLEETDECK_ENDPOINT")]
    endpoint: Option<String>,

    /// Path to the CLI config file
    #[arg(long)]
    config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon and provider connectivity status
    Status,

    /// Validate the provider credential
    AuthTest,

    /// Show the appliance scan counter
    ScanCount,

    /// Manage registered instances
    #[command(subcommand)]
    Instance(InstanceCommands),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> error::CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let endpoint = cli.endpoint.or(config.endpoint);
    let client = FleetClient::new(endpoint.as_deref(), config.timeout_seconds)?;

    match cli.command {
        Commands::Status => commands::system::status(&client, cli.output).await,
        Commands::AuthTest => commands::system::auth_test(&client).await,
        Commands::ScanCount => commands::system::scan_count(&client).await,
        Commands::Instance(command) => {
            commands::instance::execute(command, &client, cli.output).await
        }
    }
}
