//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the JWT signing secret and any
//! other sensitive configuration. `SecretString` implements `Debug` with
//! redaction, so structs that derive `Debug` while holding a secret stay safe
//! to log, and the value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningConfig {
//!     issuer: String,
//!     secret: SecretString,
//! }
//!
//! let config = SigningConfig {
//!     issuer: "api".to_string(),
//!     secret: SecretString::from("super-secret"),
//! };
//!
//! assert!(!format!("{config:?}").contains("super-secret"));
//! assert_eq!(config.secret.expose_secret(), "super-secret");
//! ```

pub use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter2");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("signing-key");
        assert_eq!(secret.expose_secret(), "signing-key");
    }

    #[test]
    fn test_clone_works() {
        let secret = SecretString::from("cloneable");
        let cloned = secret.clone();
        assert_eq!(cloned.expose_secret(), "cloneable");
    }
}
