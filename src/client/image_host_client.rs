use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{client::image_host_error::ImageHostError, config::config::ImageHostConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedImage {
    pub hosted_url: String,
    pub hosted_id: String,
}

/// External image host. One request per upload, no chunking or resume.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// `file` is either an inline `data:` url or a remote url the host fetches.
    async fn upload(&self, file: &str) -> Result<HostedImage, ImageHostError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    error: Option<UploadErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorMessage {
    message: String,
}

/// Unsigned uploads against the Cloudinary upload api.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryClient {
    pub fn new(client: Client, config: &ImageHostConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    fn upload_url(&self) -> Result<String, ImageHostError> {
        if self.cloud_name.is_empty() {
            return Err(ImageHostError::NotConfigured(
                "cloud name is empty".into(),
            ));
        }

        Ok(format!("{}/{}/image/upload", self.base_url, self.cloud_name))
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, file: &str) -> Result<HostedImage, ImageHostError> {
        let url = self.upload_url()?;
        info!("CloudinaryClient uploading image to: {}", url);

        let form = [("file", file), ("upload_preset", self.upload_preset.as_str())];
        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or("No body".into());
        if !status.is_success() {
            let message = serde_json::from_str::<UploadErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(body);

            error!("CloudinaryClient upload failed: {} - {}", status, message);
            return Err(ImageHostError::ApiError(status, message));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ImageHostError::MalformedResponse(e.to_string()))?;

        match (parsed.secure_url, parsed.public_id) {
            (Some(hosted_url), Some(hosted_id)) => Ok(HostedImage {
                hosted_url,
                hosted_id,
            }),
            _ => Err(ImageHostError::MalformedResponse(
                "missing secure_url or public_id".into(),
            )),
        }
    }
}
