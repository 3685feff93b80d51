//! API Routes
//!
//! - `/api/sign-upload` - Signed direct-upload grants
//! - `/api/delete-image` - Gallery asset deletion
//! - `/api/health` - Health checks
//!
//! The two media endpoints share one `CorsPolicy` layer.

pub mod delete_image;
pub mod health;
pub mod sign_upload;

use std::any::Any;

use axum::{
    body::Bytes,
    response::{IntoResponse, Response},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::middleware::{apply_cors, CorsPolicy};
use crate::models::AppState;
use crate::types::ApiError;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    // Panics are caught inside the CORS layer so the 500 still carries its headers.
    let media_router = Router::new()
        .merge(sign_upload::router())
        .merge(delete_image::router())
        .layer(CatchPanicLayer::custom(handle_panic));

    Router::new()
        .merge(apply_cors(media_router, CorsPolicy::media()))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into a generic 500. Details go to the log only.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Request handler panicked: {}", details);
    ApiError::Internal.into_response()
}

/// Parse a JSON body, falling back to an empty request.
///
/// A missing or malformed body then fails field validation with the
/// endpoint's own 400 response instead of an extractor rejection.
pub(crate) fn parse_body<T>(body: &Bytes) -> T
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("Ignoring unparseable request body: {}", e);
        T::default()
    })
}
