//! Instance commands

use crate::client::FleetClient;
use crate::error::CliResult;
use crate::output::{self, print_success, print_warning, OutputFormat};
use clap::Subcommand;
use colored::Colorize;
use fleetdeck_types::InstanceRecord;
use serde::Serialize;
use tabled::Tabled;

/// Instance subcommands
#[derive(Subcommand)]
pub enum InstanceCommands {
    /// List registered instances
    List,

    /// Register a new instance
    Add {
        /// Display name
        friendly_name: String,

        /// Provider-side instance ID
        remote_id: String,
    },

    /// Remove an instance
    Remove {
        /// Local instance ID
        id: String,
    },

    /// Toggle an instance's power (target is the inverse of its cached
    /// status)
    Toggle {
        /// Local instance ID
        id: String,
    },

    /// Refresh one instance's status from the provider
    Refresh {
        /// Local instance ID
        id: String,
    },

    /// Refresh every instance's status (drift sweep)
    RefreshAll,
}

/// Table row for instance display
#[derive(Debug, Serialize, Tabled)]
struct InstanceRow {
    /// Local ID (short form)
    id: String,
    /// Display name
    name: String,
    /// Provider-side ID
    remote_id: String,
    /// Cached power status
    status: String,
    /// Age
    age: String,
}

impl From<InstanceRecord> for InstanceRow {
    fn from(record: InstanceRecord) -> Self {
        let age = humanize_duration(chrono::Utc::now() - record.created_at);
        Self {
            id: truncate_id(&record.id.to_string()),
            name: record.friendly_name,
            remote_id: record.remote_id.to_string(),
            status: format_status(record.status),
            age,
        }
    }
}

fn truncate_id(id: &str) -> String {
    if id.len() > 8 {
        id[..8].to_string()
    } else {
        id.to_string()
    }
}

fn format_status(running: bool) -> String {
    if running {
        "Online".green().to_string()
    } else {
        "Offline".red().to_string()
    }
}

fn humanize_duration(duration: chrono::Duration) -> String {
    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        format!("{}s", duration.num_seconds())
    }
}

/// Execute an instance command
pub async fn execute(
    command: InstanceCommands,
    client: &FleetClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        InstanceCommands::List => {
            let instances = client.list_instances().await?;
            let rows: Vec<InstanceRow> = instances.into_iter().map(InstanceRow::from).collect();
            output::print_output(rows, format);
            Ok(())
        }

        InstanceCommands::Add {
            friendly_name,
            remote_id,
        } => {
            let record = client.add_instance(&friendly_name, &remote_id).await?;
            print_success(&format!(
                "Registered {} ({}) as {}",
                record.friendly_name, record.remote_id, record.id
            ));
            Ok(())
        }

        InstanceCommands::Remove { id } => {
            client.remove_instance(&id).await?;
            print_success(&format!("Removed instance: {}", id));
            Ok(())
        }

        InstanceCommands::Toggle { id } => {
            let result = client.toggle_power(&id).await?;
            let outcome = result["outcome"].as_str().unwrap_or("unknown");
            let message = result["message"].as_str().unwrap_or_default();
            if outcome == "confirmed" {
                print_success(message);
            } else {
                print_warning(message);
            }
            Ok(())
        }

        InstanceCommands::Refresh { id } => {
            let record = client.refresh_instance(&id).await?;
            print_success(&format!(
                "{} is {}",
                record.friendly_name,
                if record.status { "Online" } else { "Offline" }
            ));
            Ok(())
        }

        InstanceCommands::RefreshAll => {
            let result = client.refresh_all().await?;
            if result["swept"].as_bool().unwrap_or(false) {
                let updated = result["report"]["updated"].as_u64().unwrap_or(0);
                let checked = result["report"]["checked"].as_u64().unwrap_or(0);
                print_success(&format!("Checked {} instances, {} updated", checked, updated));
            } else {
                print_warning("A sweep is already in progress; skipped");
            }
            Ok(())
        }
    }
}
