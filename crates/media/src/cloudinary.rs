//! Cloudinary-compatible media host client.
//!
//! Uses the signed upload API: every request carries `api_key`, a unix
//! `timestamp`, and a SHA-256 `signature` over the alphabetically sorted
//! parameters followed by the API secret. The account must be configured
//! for SHA-256 signatures.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use vidhub_core::media::MediaCategory;

use crate::error::MediaError;
use crate::{MediaHost, UploadedMedia};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and endpoint for the media host.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Base URL without a trailing slash.
    pub api_base: String,
}

/// HTTP client for a single media host account.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryHost {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource,
            action
        )
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MediaError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Sign `params` (name, value) with `secret`.
///
/// Parameters are sorted by name and joined as `a=1&b=2`, the secret is
/// appended, and the result is SHA-256 hashed to lowercase hex.
pub fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{joined}{secret}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, path: &Path) -> Result<UploadedMedia, MediaError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.as_str())], &self.config.api_secret);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::ensure_success(response).await?.json().await?;

        tracing::info!(public_id = %body.public_id, "Uploaded media");
        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
            duration: body.duration,
        })
    }

    async fn destroy(&self, public_id: &str, category: MediaCategory) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint(category.as_str(), "destroy"))
            .multipart(form)
            .send()
            .await?;
        let body: DestroyResponse = Self::ensure_success(response).await?.json().await?;

        // "not found" means there is nothing left to remove.
        match body.result.as_str() {
            "ok" | "not found" => {
                tracing::info!(public_id, result = %body.result, "Destroyed media");
                Ok(())
            }
            other => Err(MediaError::InvalidResponse(format!(
                "destroy of '{public_id}' returned '{other}'"
            ))),
        }
    }
}
