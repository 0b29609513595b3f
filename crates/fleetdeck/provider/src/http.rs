//! HTTP implementation of the provider contract.
//!
//! Wire format:
//! - `GET {base}/instances` lists `{id, status}` for every instance visible
//!   to the credential; there is no single-instance read, so `fetch_status`
//!   lists and filters.
//! - `POST {base}/instances/{id}/start` / `.../stop` request a transition;
//!   a 2xx acknowledges the request only.
//! - `GET {base}/auth/test` validates the credential without side effects.
//!
//! Auth is a bearer credential in the `Authorization` header.

use std::time::Duration;

use async_trait::async_trait;
use fleetdeck_types::{ObservedState, RemoteInstanceId};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::api::{Ack, AuthInfo, ProviderApi};
use crate::error::{ProviderError, ProviderResult};

/// Environment variable holding the provider credential.
pub const AUTH_ENV_VAR: &str = "FLEETDECK_API_TOKEN";

/// Base URL of the provider's v2 API.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.tensordock.com/api/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One instance as reported by the provider's list endpoint.
#[derive(Debug, Deserialize)]
struct RemoteInstance {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    success: bool,
    #[serde(default, alias = "organizationId")]
    organization: Option<String>,
}

/// Reqwest-backed [`ProviderApi`] implementation.
pub struct HttpProviderClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpProviderClient {
    /// Create a client against `base_url` with the given bearer credential.
    pub fn new(base_url: impl AsRef<str>, api_token: impl Into<String>) -> ProviderResult<Self> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ProviderError::Config(format!("invalid base url {base_url}: {e}")))?;

        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(ProviderError::Config("empty api token".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    /// Create a client reading the credential from [`AUTH_ENV_VAR`].
    pub fn from_env(base_url: impl AsRef<str>) -> ProviderResult<Self> {
        let token = std::env::var(AUTH_ENV_VAR)
            .map_err(|_| ProviderError::Config(format!("missing {AUTH_ENV_VAR}")))?;
        Self::new(base_url, token)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn list_instances(&self) -> ProviderResult<Vec<RemoteInstance>> {
        let url = self.endpoint("instances");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, "list instances"));
        }

        response
            .json::<Vec<RemoteInstance>>()
            .await
            .map_err(|e| ProviderError::Protocol(e.to_string()))
    }

    async fn request_power(&self, remote_id: &RemoteInstanceId, action: &str) -> ProviderResult<Ack> {
        let url = self.endpoint(&format!("instances/{}/{}", remote_id.as_str(), action));
        debug!(remote_id = %remote_id, action, "requesting power transition");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, action));
        }

        Ok(Ack::now(remote_id.clone()))
    }
}

#[async_trait]
impl ProviderApi for HttpProviderClient {
    async fn start(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack> {
        self.request_power(remote_id, "start").await
    }

    async fn stop(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack> {
        self.request_power(remote_id, "stop").await
    }

    async fn fetch_status(&self, remote_id: &RemoteInstanceId) -> ProviderResult<ObservedState> {
        let instances = self.list_instances().await?;
        let instance = instances
            .iter()
            .find(|i| i.id == remote_id.as_str())
            .ok_or_else(|| ProviderError::NotFound(remote_id.to_string()))?;

        Ok(ObservedState::from_provider(&instance.status))
    }

    async fn test_auth(&self) -> ProviderResult<AuthInfo> {
        let url = self.endpoint("auth/test");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, "auth test"));
        }

        let body = response
            .json::<AuthTestResponse>()
            .await
            .map_err(|e| ProviderError::Protocol(e.to_string()))?;

        if !body.success {
            return Err(ProviderError::Auth(
                "provider reported unsuccessful auth test".to_string(),
            ));
        }

        Ok(AuthInfo {
            organization: body.organization,
        })
    }
}

fn classify_status(status: StatusCode, context: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Auth(format!("{context}: {status}"))
        }
        StatusCode::NOT_FOUND => ProviderError::NotFound(context.to_string()),
        s if s.is_server_error() => ProviderError::RemoteUnavailable(format!("{context}: {s}")),
        s => ProviderError::Protocol(format!("{context}: unexpected status {s}")),
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_decode() {
        ProviderError::Protocol(err.to_string())
    } else {
        ProviderError::RemoteUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "x"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "x"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "x"),
            ProviderError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "x"),
            ProviderError::RemoteUnavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::IM_A_TEAPOT, "x"),
            ProviderError::Protocol(_)
        ));
    }

    #[test]
    fn test_base_url_normalized() {
        let client = HttpProviderClient::new("https://example.com/api/v2/", "token").unwrap();
        assert_eq!(
            client.endpoint("instances/gpu-1/start"),
            "https://example.com/api/v2/instances/gpu-1/start"
        );
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            HttpProviderClient::new("not a url", "token"),
            Err(ProviderError::Config(_))
        ));
        assert!(matches!(
            HttpProviderClient::new("https://example.com", ""),
            Err(ProviderError::Config(_))
        ));
    }

    #[test]
    fn test_remote_status_parsing() {
        let body = r#"[{"id":"gpu-1","status":"running","gpu":"rtx4090"}]"#;
        let parsed: Vec<RemoteInstance> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(ObservedState::from_provider(&parsed[0].status), ObservedState::Running);
    }
}
