//! HTTP client for the Fleetdeck daemon API.

use std::time::Duration;

use fleetdeck_types::InstanceRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CliError, CliResult};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8090";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Error body returned by the daemon.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Typed client over the daemon's REST API.
pub struct FleetClient {
    http: reqwest::Client,
    base_url: String,
}

impl FleetClient {
    pub fn new(endpoint: Option<&str>, timeout_seconds: Option<u64>) -> CliResult<Self> {
        let base_url = endpoint
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let timeout = timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> CliResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        Err(CliError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn expect_empty(response: reqwest::Response) -> CliResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        Err(CliError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn list_instances(&self) -> CliResult<Vec<InstanceRecord>> {
        let response = self.http.get(self.url("instances")).send().await?;
        Self::handle(response).await
    }

    pub async fn add_instance(
        &self,
        friendly_name: &str,
        remote_id: &str,
    ) -> CliResult<InstanceRecord> {
        #[derive(Serialize)]
        struct Body<'a> {
            friendly_name: &'a str,
            remote_id: &'a str,
        }

        let response = self
            .http
            .post(self.url("instances"))
            .json(&Body {
                friendly_name,
                remote_id,
            })
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn remove_instance(&self, id: &str) -> CliResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("instances/{}", id)))
            .send()
            .await?;
        Self::expect_empty(response).await
    }

    pub async fn toggle_power(&self, id: &str) -> CliResult<Value> {
        let response = self
            .http
            .post(self.url(&format!("instances/{}/power", id)))
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn refresh_instance(&self, id: &str) -> CliResult<InstanceRecord> {
        let response = self
            .http
            .post(self.url(&format!("instances/{}/refresh", id)))
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn refresh_all(&self) -> CliResult<Value> {
        let response = self.http.post(self.url("instances/refresh")).send().await?;
        Self::handle(response).await
    }

    pub async fn daemon_status(&self) -> CliResult<Value> {
        let response = self.http.get(self.url("status")).send().await?;
        Self::handle(response).await
    }

    pub async fn auth_test(&self) -> CliResult<Value> {
        let response = self.http.post(self.url("auth/test")).send().await?;
        Self::handle(response).await
    }

    pub async fn scan_count(&self) -> CliResult<Value> {
        let response = self.http.get(self.url("scan/count")).send().await?;
        Self::handle(response).await
    }
}
