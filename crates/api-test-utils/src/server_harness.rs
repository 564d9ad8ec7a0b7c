//! Test server harness for E2E testing
//!
//! Provides `TestApiServer` for spawning real API server instances in tests.

use api_service::config::Config;
use api_service::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Signing secret used by test servers unless overridden.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-0123456789abcdef";

/// Test harness for spawning the API server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_items_e2e() -> Result<(), anyhow::Error> {
///     let server = TestApiServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/items", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestApiServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestApiServer {
    /// Spawn a server with the default test configuration.
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs
    /// in a background task until the harness is dropped.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a server, overriding configuration variables.
    ///
    /// `JWT_SECRET_KEY` defaults to [`TEST_JWT_SECRET`]; any entry in
    /// `overrides` replaces the default.
    pub async fn spawn_with_vars(
        overrides: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("JWT_SECRET_KEY".to_string(), TEST_JWT_SECRET.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        // Render handle without installing a global recorder
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let state = Arc::new(AppState::new(config.clone()));
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Call `POST /login` and return the issued access token.
    pub async fn login(&self, client: &reqwest::Client) -> Result<String, anyhow::Error> {
        let response = client
            .post(format!("{}/login", self.url()))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        body["access_token"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response missing access_token: {body}"))
    }
}

impl Drop for TestApiServer {
    fn drop(&mut self) {
        // Abort the HTTP server task so each test cleans up immediately.
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestApiServer::spawn().await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/", server.url())).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["message"], "API is running");

        Ok(())
    }

    #[tokio::test]
    async fn test_server_applies_overrides() -> Result<(), anyhow::Error> {
        let server = TestApiServer::spawn_with_vars(HashMap::from([(
            "JWT_ACCESS_TOKEN_TTL_SECONDS".to_string(),
            "60".to_string(),
        )]))
        .await?;

        assert_eq!(server.config().access_token_ttl_seconds, 60);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_helper_returns_token() -> Result<(), anyhow::Error> {
        let server = TestApiServer::spawn().await?;

        let token = server.login(&reqwest::Client::new()).await?;
        assert_eq!(token.split('.').count(), 3);

        Ok(())
    }
}
