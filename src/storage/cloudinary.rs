// Cloudinary upload API client
// API Reference: https://cloudinary.com/documentation/image_upload_api_reference#destroy
//
// Only the destroy call is made from the server. Uploads go straight from the
// browser to the service with a grant signed by `media::UploadAuthorizer`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{DestroyResult, MediaStorage, StorageError};
use crate::config::CloudinaryConfig;
use crate::signing::SignedParams;

pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryError,
}

#[derive(Deserialize)]
struct CloudinaryError {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn destroy_url(&self) -> String {
        format!(
            "{}/v1_1/{}/{}/destroy",
            self.config.api_base_url, self.config.cloud_name, self.config.resource_type
        )
    }

    /// Signed form body for a destroy call at `timestamp`.
    fn destroy_form(&self, public_id: &str, timestamp: i64) -> Result<Vec<(String, String)>, StorageError> {
        let params = SignedParams::new()
            .with("public_id", public_id)
            .with("timestamp", timestamp);
        let signature = params.sign(&self.config.api_secret, self.config.signature_algorithm)?;

        let mut form = params.to_form();
        form.push(("api_key".to_string(), self.config.api_key.clone()));
        form.push(("signature".to_string(), signature));
        Ok(form)
    }
}

#[async_trait]
impl MediaStorage for CloudinaryClient {
    async fn destroy(&self, public_id: &str) -> Result<DestroyResult, StorageError> {
        let form = self.destroy_form(public_id, chrono::Utc::now().timestamp())?;
        let url = self.destroy_url();
        debug!("Destroying {} via {}", public_id, url);

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<CloudinaryErrorResponse>(&body) {
                Ok(error_response) => error_response.error.message,
                Err(_) if body.is_empty() => status.to_string(),
                Err(_) => body,
            };
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<serde_json::Value>(&body)
            .map(DestroyResult)
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))
    }
}
