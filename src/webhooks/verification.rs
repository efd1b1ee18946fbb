//! Raw-body signature verification for inbound webhooks.
//!
//! The platform signs every webhook delivery with HMAC-SHA256 over the raw
//! request body, base64-encoded in the [`HEADER_HMAC`] header. The body must
//! be captured as the exact wire bytes for *every* content type on the
//! webhook routes — the platform does not guarantee
//! `Content-Type: application/json`, and parsing then re-serializing the
//! body breaks the digest.
//!
//! # Example
//!
//! ```rust
//! use shopify_install::auth::hmac::compute_signature_base64;
//! use shopify_install::webhooks::{verify_hmac, WebhookRequest};
//!
//! let body = b"webhook payload";
//! let hmac = compute_signature_base64(body, "secret");
//! assert!(verify_hmac(body, &hmac, "secret"));
//! assert!(!verify_hmac(body, "tampered", "secret"));
//! ```

use crate::auth::hmac::{compute_signature_base64, constant_time_compare, verify_body_hmac};
use crate::config::AppConfig;

/// HTTP header carrying the base64 HMAC-SHA256 signature of the body.
pub const HEADER_HMAC: &str = "X-Shopify-Hmac-Sha256";

/// An inbound webhook delivery, reduced to what authentication needs.
///
/// The body is raw bytes so the exact payload is preserved for the digest.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    body: Vec<u8>,
    hmac_header: String,
}

impl WebhookRequest {
    /// Creates a webhook request from the raw body and the [`HEADER_HMAC`]
    /// header value.
    #[must_use]
    pub fn new(body: Vec<u8>, hmac_header: String) -> Self {
        Self { body, hmac_header }
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the signature header value.
    #[must_use]
    pub fn hmac_header(&self) -> &str {
        &self.hmac_header
    }
}

/// Verifies a webhook body against a single secret.
///
/// Low-level building block; [`verify_request`] adds the config's key
/// rotation fallback and is what the compliance handlers use.
#[must_use]
pub fn verify_hmac(raw_body: &[u8], hmac_header: &str, secret: &str) -> bool {
    let computed = compute_signature_base64(raw_body, secret);
    constant_time_compare(&computed, hmac_header)
}

/// Verifies a webhook delivery under the app configuration.
///
/// Tries the primary API secret key first and falls back to the old key
/// when one is configured.
#[must_use]
pub fn verify_request(config: &AppConfig, request: &WebhookRequest) -> bool {
    verify_body_hmac(request.body(), request.hmac_header(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey};

    fn config_with_secret(secret: &str) -> AppConfig {
        AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new(secret).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_verify_hmac_round_trip() {
        let body = b"test payload";
        let hmac = compute_signature_base64(body, "my-secret");
        assert!(verify_hmac(body, &hmac, "my-secret"));
    }

    #[test]
    fn test_verify_hmac_rejects_invalid_signature() {
        assert!(!verify_hmac(b"test payload", "invalid-hmac", "my-secret"));
    }

    #[test]
    fn test_verify_hmac_handles_empty_body() {
        let hmac = compute_signature_base64(b"", "secret");
        assert!(verify_hmac(b"", &hmac, "secret"));
    }

    #[test]
    fn test_verify_request_with_primary_key() {
        let config = config_with_secret("primary-secret");
        let body = b"webhook body".to_vec();
        let hmac = compute_signature_base64(&body, "primary-secret");
        let request = WebhookRequest::new(body, hmac);

        assert!(verify_request(&config, &request));
    }

    #[test]
    fn test_verify_request_falls_back_to_old_key() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
            .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
            .build()
            .unwrap();

        let body = b"webhook body".to_vec();
        let hmac = compute_signature_base64(&body, "old-secret");
        let request = WebhookRequest::new(body, hmac);

        assert!(verify_request(&config, &request));
    }

    #[test]
    fn test_verify_request_rejects_wrong_secret() {
        let config = config_with_secret("right-secret");
        let body = b"webhook body".to_vec();
        let hmac = compute_signature_base64(&body, "wrong-secret");
        let request = WebhookRequest::new(body, hmac);

        assert!(!verify_request(&config, &request));
    }

    #[test]
    fn test_header_constant_matches_platform() {
        assert_eq!(HEADER_HMAC, "X-Shopify-Hmac-Sha256");
    }
}
