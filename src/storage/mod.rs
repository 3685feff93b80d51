// Storage-service access
//
// Handlers only talk to the `MediaStorage` trait so tests can swap the
// network client for an in-memory fake.

pub mod cloudinary;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signing::SigningError;

pub use cloudinary::CloudinaryClient;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from storage service: {0}")]
    InvalidResponse(String),

    #[error("Failed to sign request: {0}")]
    Signing(#[from] SigningError),
}

/// Raw result of a destroy call, e.g. `{"result": "ok"}` or `{"result": "not found"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestroyResult(pub serde_json::Value);

impl DestroyResult {
    pub fn result(&self) -> Option<&str> {
        self.0.get("result").and_then(|r| r.as_str())
    }

    pub fn is_ok(&self) -> bool {
        self.result() == Some("ok")
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn destroy(&self, public_id: &str) -> Result<DestroyResult, StorageError>;
}
