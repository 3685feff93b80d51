//! POST /api/sign-upload
//!
//! Returns a signature, timestamp and the public account identifiers so the
//! browser can upload directly to the storage service.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};

use super::parse_body;
use crate::media::UploadAuthorizer;
use crate::models::{AppState, SignedUploadGrant, UploadRequest};
use crate::types::ApiResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sign-upload", post(sign_upload))
}

async fn sign_upload(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<SignedUploadGrant>> {
    let request: UploadRequest = parse_body(&body);
    let grant = UploadAuthorizer::new(&state.config.cloudinary).authorize(&request, chrono::Utc::now())?;
    Ok(Json(grant))
}
