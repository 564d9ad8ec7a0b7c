//! Login handler.
//!
//! Resolves the submitted credentials to an identity through the configured
//! [`CredentialVerifier`](crate::auth::CredentialVerifier) and issues an
//! access token for it.

use crate::errors::ApiError;
use crate::models::{LoginRequest, LoginResponse};
use crate::observability::metrics::record_token_issued;
use crate::routes::AppState;
use axum::{body::Bytes, extract::State, Json};
use common::secret::SecretString;
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /login
///
/// The body is optional. When present it may carry `username` and
/// `password`; a body that is not valid JSON is treated like an empty one.
///
/// ## Response
///
/// ```json
/// { "access_token": "<jwt>" }
/// ```
///
/// Returns 401 if the credential verifier rejects the credentials.
#[instrument(skip_all, name = "api.handlers.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = parse_login_request(&body);
    let username = request.username.unwrap_or_default();
    let password = request
        .password
        .unwrap_or_else(|| SecretString::from(String::new()));

    let identity = state
        .credential_verifier
        .verify_credentials(&username, &password)
        .await
        .map_err(|e| {
            tracing::debug!(target: "api.handlers.login", error = %e, "Credential verification failed");
            ApiError::InvalidCredentials
        })?;

    let access_token = state.token_codec.issue(identity.as_str())?;
    record_token_issued();

    tracing::info!(
        target: "api.handlers.login",
        ttl_seconds = state.token_codec.ttl().as_secs(),
        "Access token issued"
    );

    Ok(Json(LoginResponse { access_token }))
}

/// Parse the optional login body. Empty or unparseable bodies yield defaults.
fn parse_login_request(body: &[u8]) -> LoginRequest {
    if body.iter().all(u8::is_ascii_whitespace) {
        return LoginRequest::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(target: "api.handlers.login", error = %e, "Ignoring unparseable login body");
        LoginRequest::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::{CredentialError, CredentialVerifier};
    use crate::config::Config;
    use async_trait::async_trait;
    use common::secret::ExposeSecret;
    use common::types::Identity;
    use std::collections::HashMap;

    /// Accepts only alice/wonderland.
    struct SingleUserVerifier;

    #[async_trait]
    impl CredentialVerifier for SingleUserVerifier {
        async fn verify_credentials(
            &self,
            username: &str,
            password: &SecretString,
        ) -> Result<Identity, CredentialError> {
            if username == "alice" && password.expose_secret() == "wonderland" {
                Ok(Identity::new("alice"))
            } else {
                Err(CredentialError::Rejected)
            }
        }
    }

    fn test_config() -> Config {
        let vars = HashMap::from([(
            "JWT_SECRET_KEY".to_string(),
            "login-handler-test-secret".to_string(),
        )]);
        Config::from_vars(&vars).unwrap()
    }

    #[test]
    fn test_parse_login_request_empty_body() {
        let request = parse_login_request(b"");
        assert!(request.username.is_none());
        assert!(request.password.is_none());

        let request = parse_login_request(b"  \n");
        assert!(request.username.is_none());
    }

    #[test]
    fn test_parse_login_request_garbage_body() {
        let request = parse_login_request(b"username=alice&password=x");
        assert!(request.username.is_none());
    }

    #[test]
    fn test_parse_login_request_json_body() {
        let request = parse_login_request(br#"{"username":"alice","password":"pw"}"#);
        assert_eq!(request.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_fixed_subject() {
        let state = Arc::new(AppState::new(test_config()));

        let Json(response) = login(State(state.clone()), Bytes::new()).await.unwrap();

        assert!(!response.access_token.is_empty());
        let identity = state.token_codec.verify(&response.access_token).unwrap();
        assert_eq!(identity.as_str(), "user");
    }

    #[tokio::test]
    async fn test_login_uses_pluggable_verifier() {
        let state = Arc::new(
            AppState::new(test_config()).with_credential_verifier(Arc::new(SingleUserVerifier)),
        );

        let body = Bytes::from_static(br#"{"username":"alice","password":"wonderland"}"#);
        let Json(response) = login(State(state.clone()), body).await.unwrap();
        let identity = state.token_codec.verify(&response.access_token).unwrap();
        assert_eq!(identity.as_str(), "alice");

        let bad = Bytes::from_static(br#"{"username":"alice","password":"nope"}"#);
        let err = login(State(state), bad).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
