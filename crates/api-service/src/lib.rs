//! API Service Library
//!
//! A small HTTP API with a bearer-token boundary:
//!
//! - `GET /` health check and `GET /items` static listing (public)
//! - `POST /login` issuing HS256 access tokens
//! - `GET /protected` guarded by the bearer token middleware
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/*.rs -> handlers/*.rs -> common::jwt::TokenCodec
//! ```
//!
//! # Modules
//!
//! - `auth` - Pluggable credential verification for login
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer token guard and HTTP metrics
//! - `models` - Request/response bodies
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
