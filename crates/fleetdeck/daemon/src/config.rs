//! Daemon configuration.
//!
//! Everything is settable by flag or environment variable; only the
//! provider credential is required.

use clap::Parser;
use fleetdeck_provider::DEFAULT_BASE_URL;
use std::path::PathBuf;

/// Fleetdeck orchestration daemon.
#[derive(Debug, Clone, Parser)]
#[command(name = "fleetdeckd", version, about)]
pub struct DaemonConfig {
    /// Address to listen on.
    #[arg(long, env = "FLEETDECK_LISTEN_ADDR", default_value = "127.0.0.1:8090")]
    pub listen_addr: String,

    /// Base URL of the compute provider's API.
    #[arg(long, env = "FLEETDECK_PROVIDER_URL", default_value = DEFAULT_BASE_URL)]
    pub provider_url: String,

    /// Bearer credential for the compute provider.
    #[arg(long, env = "FLEETDECK_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Path of the registry JSON file.
    #[arg(long, env = "FLEETDECK_REGISTRY_PATH", default_value = "data/registry.json")]
    pub registry_path: PathBuf,

    /// Root directory of the editable static pages.
    #[arg(long, env = "FLEETDECK_CONTENT_DIR", default_value = "content")]
    pub content_dir: PathBuf,

    /// Shared admin token gating page edits. Editing is disabled when unset.
    #[arg(long, env = "FLEETDECK_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Path of the append-only scan log.
    #[arg(long, env = "FLEETDECK_SCAN_LOG", default_value = "logs/scan_log.txt")]
    pub scan_log_path: PathBuf,

    /// Credential for the hosted vision model. Scanning is disabled when
    /// unset.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub vision_api_key: Option<String>,

    /// Vision model to scan with.
    #[arg(long, env = "FLEETDECK_VISION_MODEL", default_value = fleetdeck_scanner::DEFAULT_MODEL)]
    pub vision_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_args_parse() {
        let config =
            DaemonConfig::try_parse_from(["fleetdeckd", "--api-token", "secret"]).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8090");
        assert_eq!(config.provider_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_token, "secret");
    }

    #[test]
    fn test_overrides_parse() {
        let config = DaemonConfig::try_parse_from([
            "fleetdeckd",
            "--api-token",
            "secret",
            "--listen-addr",
            "0.0.0.0:9000",
            "--registry-path",
            "/tmp/reg.json",
        ])
        .unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.registry_path, PathBuf::from("/tmp/reg.json"));
    }
}
