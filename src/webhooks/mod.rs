//! Webhook authentication and compliance acknowledgement.
//!
//! Inbound webhook deliveries are authenticated with the raw-body HMAC
//! scheme and — for the mandatory compliance topics — answered with an
//! acknowledgement stub. The contract this module guarantees is narrow and
//! absolute: **never acknowledge an unauthenticated notification**.
//!
//! # Overview
//!
//! - [`WebhookRequest`]: raw body bytes + the [`HEADER_HMAC`] header value
//! - [`verify_hmac`] / [`verify_request`]: raw-body signature verification
//! - [`ComplianceTopic`] and [`acknowledge`]: the three mandatory privacy
//!   compliance endpoints and their 200/401 behavior
//!
//! # Example
//!
//! ```rust
//! use shopify_install::auth::hmac::compute_signature_base64;
//! use shopify_install::webhooks::{acknowledge, ComplianceTopic, WebhookRequest};
//! use shopify_install::{ApiKey, ApiSecretKey, AppConfig};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let body = br#"{"shop_domain":"example.myshopify.com"}"#.to_vec();
//! let hmac = compute_signature_base64(&body, "secret");
//! let request = WebhookRequest::new(body, hmac);
//!
//! let ack = acknowledge(&config, ComplianceTopic::ShopRedact, &request).unwrap();
//! assert_eq!(ack.status(), 200);
//! ```

mod compliance;
mod errors;
mod verification;

pub use compliance::{acknowledge, ComplianceAck, ComplianceTopic};
pub use errors::WebhookError;
pub use verification::{verify_hmac, verify_request, WebhookRequest, HEADER_HMAC};
