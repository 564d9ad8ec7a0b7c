//! API service configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! never mutated afterwards. The signing secret is redacted in Debug output.

use common::jwt::{DEFAULT_CLOCK_SKEW, DEFAULT_TOKEN_TTL, MAX_CLOCK_SKEW, MAX_TOKEN_TTL};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Subject bound to every token issued by `/login`.
pub const DEFAULT_LOGIN_SUBJECT: &str = "user";

/// API service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// HMAC secret used to sign and verify access tokens.
    pub jwt_secret: SecretString,

    /// Access token lifetime in seconds (default: 900).
    pub access_token_ttl_seconds: u64,

    /// Leeway in seconds for `exp` and `iat` validation (default: 0).
    pub jwt_clock_skew_seconds: u64,

    /// Subject bound to tokens issued by the login endpoint.
    pub login_subject: String,
}

/// Custom Debug implementation that redacts the signing secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("jwt_clock_skew_seconds", &self.jwt_clock_skew_seconds)
            .field("login_subject", &self.login_subject)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret configuration: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid access token TTL configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid login subject configuration: {0}")]
    InvalidLoginSubject(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt_secret = vars
            .get("JWT_SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET_KEY".to_string()))?;

        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidJwtSecret(
                "JWT_SECRET_KEY must not be empty".to_string(),
            ));
        }
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse access token TTL with validation
        let access_token_ttl_seconds =
            if let Some(value_str) = vars.get("JWT_ACCESS_TOKEN_TTL_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidTokenTtl(format!(
                        "JWT_ACCESS_TOKEN_TTL_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidTokenTtl(
                        "JWT_ACCESS_TOKEN_TTL_SECONDS must be greater than 0".to_string(),
                    ));
                }

                if value > MAX_TOKEN_TTL.as_secs() {
                    return Err(ConfigError::InvalidTokenTtl(format!(
                        "JWT_ACCESS_TOKEN_TTL_SECONDS must not exceed {} seconds, got {}",
                        MAX_TOKEN_TTL.as_secs(),
                        value
                    )));
                }

                value
            } else {
                DEFAULT_TOKEN_TTL.as_secs()
            };

        // Parse JWT clock skew tolerance with validation
        let jwt_clock_skew_seconds = if let Some(value_str) = vars.get("JWT_CLOCK_SKEW_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value > MAX_CLOCK_SKEW.as_secs() {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must not exceed {} seconds, got {}",
                    MAX_CLOCK_SKEW.as_secs(),
                    value
                )));
            }

            value
        } else {
            DEFAULT_CLOCK_SKEW.as_secs()
        };

        let login_subject = vars
            .get("LOGIN_SUBJECT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOGIN_SUBJECT.to_string());

        if login_subject.trim().is_empty() {
            return Err(ConfigError::InvalidLoginSubject(
                "LOGIN_SUBJECT must not be empty".to_string(),
            ));
        }

        Ok(Config {
            bind_address,
            jwt_secret,
            access_token_ttl_seconds,
            jwt_clock_skew_seconds,
            login_subject,
        })
    }

    /// Access token lifetime.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_seconds)
    }

    /// Clock skew tolerance for token validation.
    pub fn jwt_clock_skew(&self) -> Duration {
        Duration::from_secs(self.jwt_clock_skew_seconds)
    }

    /// Whether the signing secret is shorter than the HS256 output size.
    pub fn has_weak_secret(&self) -> bool {
        self.jwt_secret.expose_secret().len() < 32
    }
}
