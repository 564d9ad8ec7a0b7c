//! HTTP routes for the API service.
//!
//! Defines the Axum router and application state.

use crate::auth::{CredentialVerifier, FixedIdentityVerifier};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth, AuthState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use common::jwt::TokenCodec;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
///
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token codec for issuing and verifying access tokens.
    pub token_codec: Arc<TokenCodec>,

    /// Credential verifier consulted by the login endpoint.
    pub credential_verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Build state from configuration with the fixed-identity login verifier.
    pub fn new(config: Config) -> Self {
        let token_codec = Arc::new(TokenCodec::new(
            &config.jwt_secret,
            config.access_token_ttl(),
            config.jwt_clock_skew(),
        ));
        let credential_verifier: Arc<dyn CredentialVerifier> =
            Arc::new(FixedIdentityVerifier::new(config.login_subject.clone()));

        Self {
            config,
            token_codec,
            credential_verifier,
        }
    }

    /// Replace the credential verifier used by the login endpoint.
    pub fn with_credential_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.credential_verifier = verifier;
        self
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Health check - public
/// - `/items` - Static item list - public
/// - `/login` - Access token issuance - public
/// - `/metrics` - Prometheus metrics - public
/// - `/protected` - Requires a valid bearer token
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
///
/// Unmatched routes fall through to the framework's 404.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        token_codec: state.token_codec.clone(),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::health_check))
        .route("/items", get(handlers::list_items))
        .route("/login", post(handlers::login))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/protected", get(handlers::protected))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
