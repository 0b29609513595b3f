//! Vision model transport.
//!
//! The scanner is transport-agnostic; the default implementation posts an
//! OpenAI-style chat completion with the photo attached as a data URL.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScanError, ScanResult};

/// Environment variable holding the vision API credential.
pub const AUTH_ENV_VAR: &str = "OPENAI_API_KEY";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 500;

/// One photo to scan, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanImage {
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Base64 payload without a data-URL prefix.
    pub data_base64: String,
}

impl ScanImage {
    pub fn new(media_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data_base64: data_base64.into(),
        }
    }

    pub fn jpeg(data_base64: impl Into<String>) -> Self {
        Self::new("image/jpeg", data_base64)
    }

    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data_base64)
    }
}

/// Hosted vision call behind a pluggable seam so tests can script replies.
#[async_trait]
pub trait VisionTransport: Send + Sync {
    /// Submit the prompt plus image and return the model's raw text reply.
    async fn extract(&self, prompt: &str, image: &ScanImage) -> ScanResult<String>;
}

/// OpenAI-style chat-completions transport.
pub struct OpenAiVisionTransport {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiVisionTransport {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> ScanResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create a transport reading the credential from [`AUTH_ENV_VAR`].
    pub fn from_env(model: impl Into<String>) -> ScanResult<Self> {
        let key = std::env::var(AUTH_ENV_VAR)
            .map_err(|_| ScanError::Auth(format!("missing {}", AUTH_ENV_VAR)))?;
        Self::new(key, model)
    }

    /// Override the completions endpoint (for gateways and tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionTransport for OpenAiVisionTransport {
    async fn extract(&self, prompt: &str, image: &ScanImage) -> ScanResult<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, "submitting vision extraction");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ScanError::Auth(format!("vision endpoint returned {}", status)));
        }
        if !status.is_success() {
            return Err(ScanError::Transport(format!(
                "vision endpoint returned {}",
                status
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ScanError::Malformed("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_shape() {
        let image = ScanImage::jpeg("aGVsbG8=");
        assert_eq!(image.data_url(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "read it" },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/jpeg;base64,x".to_string(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
    }
}
