//! HMAC computation and verification for install callbacks and webhooks.
//!
//! Two verification schemes share the app's API secret key but differ in
//! canonicalization and digest encoding:
//!
//! - **Query scheme** ([`verify_query_hmac`]): used on OAuth redirects. The
//!   `hmac` parameter is removed, the remaining parameters are sorted by key
//!   (bytewise ascending) and joined as `key=value` pairs with `&`, and the
//!   HMAC-SHA256 digest is rendered as lowercase hex.
//! - **Raw-body scheme** ([`verify_body_hmac`]): used on webhooks. The digest
//!   is computed over the exact, unparsed request body bytes and rendered as
//!   base64.
//!
//! # Security
//!
//! All comparisons are constant-time. Verification failure is an ordinary
//! `false`, never an error or a panic — rejecting a request is a routine
//! outcome, not an exceptional one. Both schemes fall back to the old API
//! secret key when one is configured, so key rotation does not break
//! in-flight installs or webhook deliveries.
//!
//! # Example
//!
//! ```rust
//! use shopify_install::auth::hmac::{compute_signature, compute_signature_base64};
//!
//! let message = "code=abc123&shop=example.myshopify.com";
//! let signature = compute_signature(message, "my-api-secret");
//! assert_eq!(signature.len(), 64); // 32 bytes as lowercase hex
//!
//! let webhook_sig = compute_signature_base64(b"webhook payload", "my-api-secret");
//! assert_eq!(webhook_sig.len(), 44); // 32 bytes as base64
//! ```

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the signature on OAuth redirects.
pub const HMAC_PARAM: &str = "hmac";

/// Computes an HMAC-SHA256 signature, rendered as lowercase hexadecimal.
///
/// # Note
///
/// Uses `expect()` internally, but HMAC-SHA256 accepts keys of any length,
/// so construction never fails.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Computes an HMAC-SHA256 signature over raw bytes, rendered as base64.
///
/// Accepts raw bytes (not a string) so the exact payload is signed without
/// any UTF-8 interpretation — the webhook body must reach this function
/// unparsed and untransformed.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature_base64(message: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Used for every signature comparison in the crate to prevent timing
/// attacks. Handles different lengths securely.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Builds the canonical signable string for the query scheme.
///
/// Removes the [`HMAC_PARAM`] entry, sorts the remaining pairs by key in
/// ascending bytewise order, and joins them as `key=value` with `&`. Values
/// are used exactly as received from the query parser — they are not
/// re-percent-encoded. A value that itself contains `&` or `=` therefore
/// concatenates ambiguously; the platform signs the same unescaped form, so
/// this is the canonical behavior, not a defect.
#[must_use]
pub fn signable_query(params: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = params
        .iter()
        .filter(|(key, _)| key != HMAC_PARAM)
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validates the query-scheme HMAC of an OAuth redirect.
///
/// Every received parameter except `hmac` itself takes part in the
/// canonicalization — the `host` context token is an ordinary parameter
/// here, not excluded. Returns `false` when the `hmac` parameter is absent,
/// when the signature does not match under the primary secret, and (if one
/// is configured) under the old secret.
#[must_use]
pub fn verify_query_hmac(params: &[(String, String)], config: &AppConfig) -> bool {
    let Some(provided) = params
        .iter()
        .find(|(key, _)| key == HMAC_PARAM)
        .map(|(_, value)| value.as_str())
    else {
        return false;
    };

    let signable = signable_query(params);

    let computed = compute_signature(&signable, config.api_secret_key().as_ref());
    if constant_time_compare(&computed, provided) {
        return true;
    }

    if let Some(old_secret) = config.old_api_secret_key() {
        let computed_old = compute_signature(&signable, old_secret.as_ref());
        if constant_time_compare(&computed_old, provided) {
            return true;
        }
    }

    false
}

/// Validates the raw-body HMAC of a webhook delivery.
///
/// `raw_body` must be the exact bytes received on the wire, captured before
/// any content-type-based parsing — parsing and re-serializing the body
/// breaks the digest. Same old-secret fallback as [`verify_query_hmac`].
#[must_use]
pub fn verify_body_hmac(raw_body: &[u8], provided: &str, config: &AppConfig) -> bool {
    let computed = compute_signature_base64(raw_body, config.api_secret_key().as_ref());
    if constant_time_compare(&computed, provided) {
        return true;
    }

    if let Some(old_secret) = config.old_api_secret_key() {
        let computed_old = compute_signature_base64(raw_body, old_secret.as_ref());
        if constant_time_compare(&computed_old, provided) {
            return true;
        }
    }

    false
}

// Internal hex encoding since we don't want to add another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}
