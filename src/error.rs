//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation at process start. Verification outcomes (HMAC checks)
//! are deliberately *not* errors — see [`crate::auth::hmac`].

use thiserror::Error;

/// Errors that can occur while constructing process configuration.
///
/// Each variant carries a clear, actionable message. These errors surface
/// once at startup; none of them occur during request handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Shopify API key.")]
    EmptyApiKey,

    /// API secret key cannot be empty.
    #[error("API secret key cannot be empty. Please provide a valid Shopify API secret key.")]
    EmptyApiSecretKey,

    /// App handle is invalid.
    #[error("Invalid app handle '{handle}'. Expected lowercase letters, digits, and hyphens.")]
    InvalidAppHandle {
        /// The invalid handle that was provided.
        handle: String,
    },

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// Listen port is not a valid port number.
    #[error("Invalid listen port '{value}'. Expected an integer between 1 and 65535.")]
    InvalidPort {
        /// The invalid port string that was provided.
        value: String,
    },

    /// A required builder field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing required environment variable '{name}'.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let error = ConfigError::EmptyApiKey;
        assert!(error.to_string().contains("API key cannot be empty"));
    }

    #[test]
    fn test_invalid_shop_domain_error_message() {
        let error = ConfigError::InvalidShopDomain {
            domain: "bad domain!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad domain!"));
        assert!(message.contains("Expected format"));
    }

    #[test]
    fn test_invalid_port_error_message() {
        let error = ConfigError::InvalidPort {
            value: "eighty".to_string(),
        };
        assert!(error.to_string().contains("eighty"));
    }

    #[test]
    fn test_missing_env_var_error_message() {
        let error = ConfigError::MissingEnvVar {
            name: "SHOPIFY_API_SECRET",
        };
        assert!(error.to_string().contains("SHOPIFY_API_SECRET"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyApiKey;
        let _: &dyn std::error::Error = &error;
    }
}
