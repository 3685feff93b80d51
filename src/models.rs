use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::storage::MediaStorage;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn MediaStorage>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            config: Arc::new(config),
            storage,
        }
    }
}

// API Request/Response types
//
// Request fields stay raw JSON so a mistyped field is judged on its own by the
// validators instead of failing the whole body.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub folder: Option<Value>,
    #[serde(default)]
    pub public_id: Option<Value>,
}

/// What the browser needs to finish a direct upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedUploadGrant {
    pub signature: String,
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub public_id: Option<Value>,
}

/// A field counts as supplied unless it is absent, `null`, `false`, `0` or `""`.
pub fn is_present(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Scalar field as the text submitted to the storage service.
pub fn scalar_text(field: &Option<Value>) -> Option<String> {
    match field {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

impl DeleteOutcome {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Image deleted successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
