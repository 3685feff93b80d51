// Asset deletion restricted to the gallery namespace

use serde_json::Value;
use tracing::{error, info, warn};

use super::policy::is_deletable;
use crate::models::{is_present, DeleteOutcome, DeleteRequest};
use crate::storage::MediaStorage;
use crate::types::{ApiError, ApiResult};

pub struct AssetDeleter<'a> {
    storage: &'a dyn MediaStorage,
}

impl<'a> AssetDeleter<'a> {
    pub fn new(storage: &'a dyn MediaStorage) -> Self {
        Self { storage }
    }

    pub async fn delete(&self, request: &DeleteRequest) -> ApiResult<DeleteOutcome> {
        if !is_present(&request.public_id) {
            warn!("Delete rejected: missing public_id");
            return Err(ApiError::MissingPublicId);
        }

        // Only a string id can name an asset under the gallery prefix.
        let public_id = match request.public_id.as_ref().and_then(Value::as_str) {
            Some(id) if is_deletable(id) => id,
            _ => {
                warn!("Delete rejected: {:?} is outside the gallery folder", request.public_id);
                return Err(ApiError::ForbiddenPath);
            }
        };

        let result = self.storage.destroy(public_id).await.map_err(|e| {
            error!("Error deleting image: {}", e);
            ApiError::DeletionFailure(e.to_string())
        })?;

        if result.is_ok() {
            info!("Deleted {}", public_id);
            Ok(DeleteOutcome::deleted())
        } else {
            warn!("Storage service refused to delete {}: {:?}", public_id, result.result());
            Err(ApiError::DeletionRejected(result.into_inner()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DestroyResult, StorageError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records calls and answers with a fixed outcome.
    struct ScriptedStorage {
        reply: fn() -> Result<DestroyResult, StorageError>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedStorage {
        fn new(reply: fn() -> Result<DestroyResult, StorageError>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaStorage for ScriptedStorage {
        async fn destroy(&self, public_id: &str) -> Result<DestroyResult, StorageError> {
            self.calls.lock().unwrap().push(public_id.to_string());
            (self.reply)()
        }
    }

    fn request(public_id: Option<&str>) -> DeleteRequest {
        DeleteRequest {
            public_id: public_id.map(|id| json!(id)),
        }
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let storage = ScriptedStorage::new(|| Ok(DestroyResult(json!({"result": "ok"}))));
        let deleter = AssetDeleter::new(&storage);

        let outcome = deleter.delete(&request(Some("gallery/x.png"))).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::deleted());
        assert_eq!(storage.calls(), vec!["gallery/x.png".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_public_id_never_reaches_storage() {
        let storage = ScriptedStorage::new(|| Ok(DestroyResult(json!({"result": "ok"}))));
        let deleter = AssetDeleter::new(&storage);

        for req in [request(None), request(Some(""))] {
            assert!(matches!(
                deleter.delete(&req).await,
                Err(ApiError::MissingPublicId)
            ));
        }
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_path_never_reaches_storage() {
        let storage = ScriptedStorage::new(|| Ok(DestroyResult(json!({"result": "ok"}))));
        let deleter = AssetDeleter::new(&storage);

        assert!(matches!(
            deleter.delete(&request(Some("avatars/x.png"))).await,
            Err(ApiError::ForbiddenPath)
        ));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_string_public_id_is_forbidden() {
        let storage = ScriptedStorage::new(|| Ok(DestroyResult(json!({"result": "ok"}))));
        let deleter = AssetDeleter::new(&storage);

        for public_id in [json!(42), json!(["gallery/x.png"]), json!({"id": "gallery/x.png"})] {
            let req = DeleteRequest {
                public_id: Some(public_id),
            };
            assert!(matches!(deleter.delete(&req).await, Err(ApiError::ForbiddenPath)));
        }

        let zero = DeleteRequest {
            public_id: Some(json!(0)),
        };
        assert!(matches!(deleter.delete(&zero).await, Err(ApiError::MissingPublicId)));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_forwards_raw_result() {
        let storage = ScriptedStorage::new(|| Ok(DestroyResult(json!({"result": "not found"}))));
        let deleter = AssetDeleter::new(&storage);

        // Same outcome on repeat, nothing accumulates between calls.
        for _ in 0..2 {
            match deleter.delete(&request(Some("gallery/gone.png"))).await {
                Err(ApiError::DeletionRejected(details)) => {
                    assert_eq!(details, json!({"result": "not found"}));
                }
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
        assert_eq!(storage.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_carries_message() {
        let storage = ScriptedStorage::new(|| {
            Err(StorageError::Api {
                status: 401,
                message: "Invalid Signature".to_string(),
            })
        });
        let deleter = AssetDeleter::new(&storage);

        match deleter.delete(&request(Some("gallery/x.png"))).await {
            Err(ApiError::DeletionFailure(message)) => assert_eq!(message, "Invalid Signature"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
