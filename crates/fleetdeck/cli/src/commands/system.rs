//! Status and auth commands

use crate::client::FleetClient;
use crate::error::CliResult;
use crate::output::{print_error, print_success, OutputFormat};
use colored::Colorize;

/// Show the daemon's provider connectivity summary.
pub async fn status(client: &FleetClient, format: OutputFormat) -> CliResult<()> {
    let status = client.daemon_status().await?;

    if format == OutputFormat::Json {
        crate::output::print_single(&status, format);
        return Ok(());
    }

    let connected = status["connected"].as_bool().unwrap_or(false);
    let message = status["message"].as_str().unwrap_or_default();
    if connected {
        println!("{} {}", "●".green(), message);
        if let Some(org) = status["organization"].as_str() {
            println!("  organization: {}", org);
        }
    } else {
        println!("{} {}", "●".red(), message);
    }
    Ok(())
}

/// Validate the provider credential.
pub async fn auth_test(client: &FleetClient) -> CliResult<()> {
    match client.auth_test().await {
        Ok(result) => {
            match result["organization"].as_str() {
                Some(org) => print_success(&format!("Credential accepted (organization {})", org)),
                None => print_success("Credential accepted"),
            }
            Ok(())
        }
        Err(err) => {
            print_error(&format!("Credential check failed: {}", err));
            Err(err)
        }
    }
}

/// Show the appliance scan counter.
pub async fn scan_count(client: &FleetClient) -> CliResult<()> {
    let result = client.scan_count().await?;
    let count = result["count"].as_u64().unwrap_or(0);
    println!("{} appliance tags scanned", count);
    Ok(())
}
