//! JWT issuance and verification.
//!
//! This module provides the token codec used by the API service:
//! - Size limits for DoS prevention
//! - Token lifetime and clock skew constants
//! - [`Claims`] with a redacted `sub` in Debug output
//! - [`TokenCodec`] for signing and verifying HS256 access tokens
//! - exp and iat validation logic
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted; the algorithm in the token header is never trusted
//! - Expiry is always checked against the server clock
//! - Error messages are generic; the specific failure kind is logged at debug
//!
//! # Usage
//!
//! ```rust
//! use common::jwt::{TokenCodec, DEFAULT_CLOCK_SKEW, DEFAULT_TOKEN_TTL};
//! use common::secret::SecretString;
//!
//! let codec = TokenCodec::new(
//!     &SecretString::from("signing-secret"),
//!     DEFAULT_TOKEN_TTL,
//!     DEFAULT_CLOCK_SKEW,
//! );
//!
//! let token = codec.issue("user").unwrap();
//! let identity = codec.verify(&token).unwrap();
//! assert_eq!(identity.as_str(), "user");
//! ```

use crate::secret::{ExposeSecret, SecretString};
use crate::types::Identity;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected BEFORE any base64 decoding or HMAC
/// computation. A typical access token here is well under 300 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Default access token lifetime (15 minutes).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(900);

/// Maximum configurable access token lifetime (24 hours).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(86_400);

/// Default clock skew tolerance.
///
/// Tokens are issued and verified by the same process clock, so no leeway
/// is applied unless configured.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(0);

/// Maximum allowed clock skew tolerance (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

/// Generic client-facing message for every verification failure.
pub const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

// =============================================================================
// Error Types
// =============================================================================

/// Errors produced by the token codec.
///
/// Verification failures share one generic Display string so they can be
/// surfaced without leaking which check failed. Use [`TokenError::kind`]
/// for logs and metrics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    TokenTooLarge,

    /// Input is not a well-formed token (structure, base64, JSON or claims).
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    Malformed,

    /// Signature does not match the configured secret.
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    InvalidSignature,

    /// The `exp` claim is in the past.
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    Expired,

    /// The `iat` claim is further in the future than the clock skew allows.
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    IatTooFarInFuture,

    /// Signing a new token failed.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short, bounded label for this error, suitable for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::TokenTooLarge | TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::IatTooFarInFuture => "iat_in_future",
            TokenError::Signing(_) => "signing_failed",
        }
    }
}

// =============================================================================
// Claims Types
// =============================================================================

/// Access token claims.
///
/// The `sub` field is redacted in Debug output to prevent accidental logging
/// of user identifiers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier) - redacted in Debug output.
    pub sub: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl Claims {
    /// Creates claims for `sub` issued at `iat` and valid for `ttl`.
    #[must_use]
    pub fn new(sub: String, iat: i64, ttl: Duration) -> Self {
        Self {
            sub,
            iat,
            exp: iat.saturating_add(duration_secs(ttl)),
        }
    }

    /// The identity asserted by these claims.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone())
    }
}

// =============================================================================
// Token Codec
// =============================================================================

/// Signs and verifies HS256 access tokens with a process-wide secret.
///
/// Built once at startup from configuration and shared read-only between
/// requests; it holds no mutable state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock_skew: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .field("clock_skew", &self.clock_skew)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec that signs with `secret`.
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC signing secret
    /// * `ttl` - Lifetime of issued tokens
    /// * `clock_skew` - Leeway applied to `exp` and `iat` checks
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration, clock_skew: Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            ttl,
            clock_skew,
        }
    }

    /// Lifetime of tokens issued by this codec.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for `subject`, valid from now for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the JWT library fails to encode the token.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// Prefer [`TokenCodec::issue`] in production code. This variant exists so
    /// expiry boundaries can be tested without waiting on the wall clock.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the JWT library fails to encode the token.
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<String, TokenError> {
        let claims = Claims::new(subject.to_string(), now, self.ttl);

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(target: "common.jwt", error = %e, "JWT signing operation failed");
            TokenError::Signing(e.to_string())
        })
    }

    /// Verify `token` and return the identity it asserts.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::decode_claims`].
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.decode_claims(token).map(|claims| claims.identity())
    }

    /// Verify `token` and return its full claims.
    ///
    /// # Checks
    ///
    /// 1. Size check - reject tokens > 8KB before parsing
    /// 2. HS256 signature against the configured secret
    /// 3. `exp` strictly after the server clock (with configured leeway)
    /// 4. `iat` not further in the future than the clock skew
    ///
    /// # Errors
    ///
    /// - `TokenTooLarge` - Token exceeds [`MAX_JWT_SIZE_BYTES`]
    /// - `Malformed` - Not a well-formed token or missing required claims
    /// - `InvalidSignature` - Signature (or algorithm) does not match
    /// - `Expired` - `exp` is not after the current time
    /// - `IatTooFarInFuture` - `iat` is ahead of the server clock
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "common.jwt",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(TokenError::TokenTooLarge);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.clock_skew.as_secs();
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            };
            tracing::debug!(
                target: "common.jwt",
                error = %e,
                kind = err.kind(),
                "Token verification failed"
            );
            err
        })?;

        let now = chrono::Utc::now().timestamp();
        validate_exp_at(token_data.claims.exp, self.clock_skew, now)?;
        validate_iat_at(token_data.claims.iat, self.clock_skew, now)?;

        Ok(token_data.claims)
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Validate the `iat` (issued-at) claim against `now` with clock skew tolerance.
///
/// Rejects tokens whose `iat` lies more than `clock_skew` in the future.
pub(crate) fn validate_iat_at(iat: i64, clock_skew: Duration, now: i64) -> Result<(), TokenError> {
    let clock_skew_secs = duration_secs(clock_skew);
    let max_iat = now.saturating_add(clock_skew_secs);

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            clock_skew_secs = clock_skew_secs,
            "Token rejected: iat too far in the future"
        );
        return Err(TokenError::IatTooFarInFuture);
    }

    Ok(())
}

/// Deterministic `exp` validation against an explicit `now` timestamp.
///
/// A token is valid only while `now < exp + clock_skew`, so a token whose
/// `exp` equals the current second is already expired.
pub(crate) fn validate_exp_at(exp: i64, clock_skew: Duration, now: i64) -> Result<(), TokenError> {
    let clock_skew_secs = duration_secs(clock_skew);

    if exp.saturating_add(clock_skew_secs) <= now {
        tracing::debug!(
            target: "common.jwt",
            exp = exp,
            now = now,
            clock_skew_secs = clock_skew_secs,
            "Token rejected: expired"
        );
        return Err(TokenError::Expired);
    }

    Ok(())
}

/// Whole seconds of `duration` as i64, saturating.
fn duration_secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(
            &SecretString::from(secret.to_string()),
            DEFAULT_TOKEN_TTL,
            DEFAULT_CLOCK_SKEW,
        )
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    // -------------------------------------------------------------------------
    // Constants Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_max_jwt_size_is_8kb() {
        assert_eq!(MAX_JWT_SIZE_BYTES, 8192);
    }

    #[test]
    fn test_default_ttl_is_15_minutes() {
        assert_eq!(DEFAULT_TOKEN_TTL, Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_max_clock_skew_is_10_minutes() {
        assert_eq!(MAX_CLOCK_SKEW, Duration::from_secs(600));
    }

    // -------------------------------------------------------------------------
    // issue / verify
    // -------------------------------------------------------------------------

    #[test]
    fn test_verify_returns_issued_subject() {
        let codec = codec("test-secret");

        for subject in ["user", "alice", "svc:billing", "ünïcødé"] {
            let token = codec.issue(subject).unwrap();
            let identity = codec.verify(&token).unwrap();
            assert_eq!(identity.as_str(), subject);
        }
    }

    #[test]
    fn test_issued_claims_carry_iat_and_exp() {
        let codec = codec("test-secret");
        let before = now();

        let token = codec.issue("user").unwrap();
        let claims = codec.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, "user");
        assert!(claims.iat >= before);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_token_has_three_segments_and_hs256_header() {
        let token = codec("test-secret").issue("user").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header_bytes = URL_SAFE_NO_PAD.decode(parts[0]).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&header_bytes).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_issue_is_deterministic_for_same_inputs() {
        let codec = codec("test-secret");
        let at = 1_700_000_000;

        assert_eq!(
            codec.issue_at("user", at).unwrap(),
            codec.issue_at("user", at).unwrap()
        );
    }

    #[test]
    fn test_verify_rejects_token_signed_with_other_secret() {
        let token = codec("secret-a").issue("user").unwrap();

        let result = codec("secret-b").verify(&token);
        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let codec = codec("test-secret");
        let token = codec.issue_at("user", now() - 3600).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_rejects_token_expiring_this_second() {
        let secret = SecretString::from("test-secret");
        let ttl = Duration::from_secs(1);
        let codec = TokenCodec::new(&secret, ttl, DEFAULT_CLOCK_SKEW);

        // exp == now
        let token = codec.issue_at("user", now() - 1).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_rejects_token_at_ttl_boundary() {
        let codec = codec("test-secret");
        let ttl = i64::try_from(DEFAULT_TOKEN_TTL.as_secs()).unwrap();

        let token = codec.issue_at("user", now() - ttl).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_signature_is_checked_before_expiry() {
        let token = codec("secret-a").issue_at("user", now() - 3600).unwrap();

        assert_eq!(
            codec("secret-b").verify(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_clock_skew_extends_expiry() {
        let secret = SecretString::from("test-secret");
        let strict = TokenCodec::new(&secret, Duration::from_secs(60), Duration::from_secs(0));
        let lenient = TokenCodec::new(&secret, Duration::from_secs(60), Duration::from_secs(300));

        // exp = now - 60
        let token = strict.issue_at("user", now() - 120).unwrap();

        assert_eq!(strict.verify(&token), Err(TokenError::Expired));
        assert!(lenient.verify(&token).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let codec = codec("test-secret");
        let token = codec.issue("user").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"sub":"admin","iat":{},"exp":{}}}"#,
                now(),
                now() + 900
            )
            .as_bytes(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let codec = codec("test-secret");

        for input in ["", "not-a-jwt", "only.two", "a.b.c", "!!!.@@@.###"] {
            assert_eq!(
                codec.verify(input),
                Err(TokenError::Malformed),
                "input {input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_verify_rejects_missing_sub_claim() {
        let secret = "test-secret";
        let claims = serde_json::json!({ "iat": now(), "exp": now() + 900 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec(secret).verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_verify_rejects_oversized_token() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);

        assert_eq!(
            codec("test-secret").verify(&oversized),
            Err(TokenError::TokenTooLarge)
        );
    }

    #[test]
    fn test_verify_rejects_future_iat() {
        let codec = codec("test-secret");
        let token = codec.issue_at("user", now() + 3600).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::IatTooFarInFuture));
    }

    // -------------------------------------------------------------------------
    // validate_iat / validate_exp
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_iat_boundaries() {
        let skew = Duration::from_secs(300);
        let now = 1_700_000_000;

        assert!(validate_iat_at(now, skew, now).is_ok());
        assert!(validate_iat_at(now + 300, skew, now).is_ok());
        assert_eq!(
            validate_iat_at(now + 301, skew, now),
            Err(TokenError::IatTooFarInFuture)
        );
        assert!(validate_iat_at(now - 86_400, skew, now).is_ok());
    }

    #[test]
    fn test_validate_exp_boundaries() {
        let now = 1_700_000_000;

        assert!(validate_exp_at(now + 1, Duration::ZERO, now).is_ok());
        assert_eq!(
            validate_exp_at(now, Duration::ZERO, now),
            Err(TokenError::Expired)
        );

        let skew = Duration::from_secs(60);
        assert!(validate_exp_at(now - 59, skew, now).is_ok());
        assert_eq!(
            validate_exp_at(now - 60, skew, now),
            Err(TokenError::Expired)
        );
    }

    // -------------------------------------------------------------------------
    // Errors and Debug
    // -------------------------------------------------------------------------

    #[test]
    fn test_verification_errors_share_generic_message() {
        for err in [
            TokenError::TokenTooLarge,
            TokenError::Malformed,
            TokenError::InvalidSignature,
            TokenError::Expired,
            TokenError::IatTooFarInFuture,
        ] {
            assert_eq!(err.to_string(), INVALID_TOKEN_MESSAGE);
        }
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_eq!(TokenError::Malformed.kind(), "malformed");
        assert_eq!(TokenError::TokenTooLarge.kind(), "malformed");
        assert_eq!(TokenError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(TokenError::Expired.kind(), "expired");
        assert_eq!(TokenError::IatTooFarInFuture.kind(), "iat_in_future");
    }

    #[test]
    fn test_claims_debug_redacts_sub() {
        let claims = Claims::new("secret-user-id".to_string(), 1_700_000_000, DEFAULT_TOKEN_TTL);
        let debug_str = format!("{claims:?}");

        assert!(!debug_str.contains("secret-user-id"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("1700000000"));
    }

    #[test]
    fn test_codec_debug_hides_keys() {
        let debug_str = format!("{:?}", codec("do-not-print"));
        assert!(!debug_str.contains("do-not-print"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
