//! POST /api/delete-image
//!
//! Deletes one asset under `gallery/` from the storage service. Only the path
//! prefix is checked; any caller that reaches the endpoint can delete any
//! gallery asset.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use super::parse_body;
use crate::media::AssetDeleter;
use crate::models::{AppState, DeleteOutcome, DeleteRequest};
use crate::types::ApiResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/delete-image", post(delete_image))
}

async fn delete_image(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<DeleteOutcome>> {
    let request: DeleteRequest = parse_body(&body);
    let outcome = AssetDeleter::new(state.storage.as_ref()).delete(&request).await?;
    Ok(Json(outcome))
}
