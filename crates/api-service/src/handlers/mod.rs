//! HTTP request handlers for the API service.

pub mod health;
pub mod items;
pub mod login;
pub mod metrics;
pub mod protected;

pub use health::health_check;
pub use items::list_items;
pub use login::login;
pub use metrics::metrics_handler;
pub use protected::protected;
