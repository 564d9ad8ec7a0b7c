//! Observability for the API service.
//!
//! - `metrics` - Prometheus metric definitions and recorder setup

pub mod metrics;
