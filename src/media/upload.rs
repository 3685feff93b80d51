//! Signed upload grants
//!
//! The browser uploads straight to the storage service. This module decides
//! whether a destination is allowed and signs the exact parameter set the
//! browser must submit with the file.
//!
//! | folder        | signed parameters                                          |
//! |---------------|------------------------------------------------------------|
//! | `teamMembers` | `folder`, `invalidate=true`, `overwrite=true`, `public_id`, `timestamp` |
//! | `gallery`     | `folder`, `public_id`, `timestamp`                         |

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use super::policy::UploadFolder;
use crate::config::CloudinaryConfig;
use crate::models::{is_present, scalar_text, SignedUploadGrant, UploadRequest};
use crate::signing::SignedParams;
use crate::types::{ApiError, ApiResult};

pub struct UploadAuthorizer<'a> {
    config: &'a CloudinaryConfig,
}

impl<'a> UploadAuthorizer<'a> {
    pub fn new(config: &'a CloudinaryConfig) -> Self {
        Self { config }
    }

    /// Validate the request and sign a grant at `now`.
    pub fn authorize(&self, request: &UploadRequest, now: DateTime<Utc>) -> ApiResult<SignedUploadGrant> {
        if !is_present(&request.folder) || !is_present(&request.public_id) {
            warn!("Upload signature rejected: missing folder or public_id");
            return Err(ApiError::MissingFields);
        }

        let folder: UploadFolder = request
            .folder
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| {
                warn!("Upload signature rejected: folder {:?} is not allowed", request.folder);
                ApiError::UnauthorizedFolder
            })?;

        // Arrays and objects have no text form to sign.
        let public_id = scalar_text(&request.public_id).ok_or_else(|| {
            warn!("Upload signature rejected: public_id is not a scalar");
            ApiError::MissingFields
        })?;

        // Whole seconds, truncated.
        let timestamp = now.timestamp();
        let params = upload_params(folder, &public_id, timestamp);

        let signature = params
            .sign(&self.config.api_secret, self.config.signature_algorithm)
            .map_err(|e| {
                error!("Error generating signature: {}", e);
                ApiError::SigningFailure(e.to_string())
            })?;

        info!("Signed upload for {}/{} at {}", folder, public_id, timestamp);

        Ok(SignedUploadGrant {
            signature,
            timestamp,
            cloud_name: self.config.cloud_name.clone(),
            api_key: self.config.api_key.clone(),
        })
    }
}

/// The parameter set the client submits along with the signature.
pub fn upload_params(folder: UploadFolder, public_id: &str, timestamp: i64) -> SignedParams {
    let mut params = SignedParams::new()
        .with("timestamp", timestamp)
        .with("folder", folder.as_str())
        .with("public_id", public_id);

    if folder.replaces_existing() {
        params.insert("overwrite", true);
        params.insert("invalidate", true);
    }

    params
}
