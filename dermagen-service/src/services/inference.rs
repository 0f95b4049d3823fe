//! HTTP client for the external image inference service.
//!
//! The service synthesizes lesion images for a conditioning index and answers
//! with base64 PNG payloads. Older deployments answer with a single
//! `image_base64`, newer ones with a list; both are accepted.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Duration;

/// Something that can synthesize images for a conditioning index.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Returns base64 payloads in the order produced by the backend.
    async fn synthesize(&self, class_idx: u8, num_images: u32) -> Result<Vec<String>, AppError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest {
    class_idx: u8,
    num_images: u32,
}

/// Response shapes of the inference service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamImages {
    Multiple {
        #[serde(alias = "images")]
        images_base64: Vec<String>,
    },
    Single {
        image_base64: String,
    },
}

impl UpstreamImages {
    pub fn into_payloads(self) -> Vec<String> {
        match self {
            UpstreamImages::Multiple { images_base64 } => images_base64,
            UpstreamImages::Single { image_base64 } => vec![image_base64],
        }
    }
}

/// Decode a successful inference response body into base64 payloads.
pub fn decode_images(body: &[u8]) -> Result<Vec<String>, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        AppError::BadGateway(format!("AI service returned invalid JSON: {}", e))
    })?;

    UpstreamImages::deserialize(value)
        .map(UpstreamImages::into_payloads)
        .map_err(|_| AppError::BadGateway("missing images in response".to_string()))
}

/// Strip trailing slashes and a trailing `/generate` segment so that a
/// base URL configured with the endpoint path still works.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/generate")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

/// Pull the human readable reason out of an upstream error body.
fn upstream_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("AI service returned status {}", status.as_u16()))
}

pub struct InferenceClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error, url: &str) -> AppError {
        if e.is_connect() {
            tracing::error!(url = %url, error = %e, "AI service unreachable");
            AppError::ServiceUnavailable(format!(
                "AI service is not available. Please ensure the inference service is running at {}.",
                self.base_url
            ))
        } else if e.is_timeout() {
            tracing::error!(url = %url, timeout_secs = self.timeout.as_secs(), "AI service timed out");
            AppError::ServiceUnavailable(format!(
                "AI service did not respond within {} seconds.",
                self.timeout.as_secs()
            ))
        } else {
            tracing::error!(url = %url, error = ?e, "AI service request failed");
            AppError::InternalError(anyhow::anyhow!("Failed to generate images: {}", e))
        }
    }
}

#[async_trait]
impl ImageSynthesizer for InferenceClient {
    async fn synthesize(&self, class_idx: u8, num_images: u32) -> Result<Vec<String>, AppError> {
        let url = self.generate_url();

        tracing::debug!(url = %url, class_idx, num_images, "Sending request to AI service");

        let response = self
            .client
            .post(&url)
            .json(&SynthesisRequest {
                class_idx,
                num_images,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e, &url))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_send_error(e, &url))?;

        if !status.is_success() {
            let detail = upstream_detail(status, &String::from_utf8_lossy(&body));
            tracing::error!(
                status = status.as_u16(),
                detail = %detail,
                "AI service returned an error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        decode_images(&body).inspect_err(|e| {
            tracing::error!(error = %e, "AI service response could not be used");
        })
    }
}
