//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /generate` running one pipeline session per request
//! - Health and Prometheus metrics endpoints
//! - Request logging, CORS and body size limits

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
