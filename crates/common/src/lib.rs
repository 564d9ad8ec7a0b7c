//! Common utilities and types shared across the API service crates.

#![warn(clippy::pedantic)]

/// Module for common data types
pub mod types;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT issuance and verification (token codec, claims, constants)
pub mod jwt;
