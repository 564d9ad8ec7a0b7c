//! Middleware for the API service.
//!
//! # Components
//!
//! - `auth` - Bearer token guard for protected routes
//! - `http_metrics` - HTTP request metrics middleware

pub mod auth;
pub mod http_metrics;

pub use auth::{authorize, require_auth, AuthState, Unauthorized};
pub use http_metrics::http_metrics_middleware;
