// Media Gateway - signed uploads and gallery deletion for a hosted media service

pub mod config;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod signing;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
