//! # Shopify Install Rust
//!
//! Install-flow toolkit for embedded Shopify apps: OAuth callback
//! validation, HMAC verification for redirects and webhooks, and the
//! navigation decisions that drive the embedded app surface.
//!
//! ## Overview
//!
//! Installing an app into the Shopify admin takes a small, sharp-edged
//! dance: the platform redirects the merchant's browser through the app
//! with HMAC-signed query strings, expects an authorization-code exchange,
//! probes the app URL with and without an embedded flag, and delivers
//! signed compliance webhooks. This crate implements the decision engine
//! for that dance:
//!
//! - **MAC verification** ([`auth::hmac`]): the query-string scheme
//!   (sorted parameters, hex digest) and the raw-body scheme (exact bytes,
//!   base64 digest), both constant-time, both with key-rotation fallback.
//! - **Tenant resolution** ([`tenant`]): deriving the store slug from the
//!   opaque base64 `host` context token, falling back to the `shop` domain.
//! - **Callback completion** ([`auth::complete_auth_callback`]): validate,
//!   exchange the code exactly once, redirect to the hosted app surface.
//! - **Embed navigation** ([`embed::decide_navigation`]): the ordered rule
//!   list choosing between the consent/grant redirect, the app surface
//!   redirect, the in-iframe render, and the fallback body.
//! - **Webhook authentication** ([`webhooks`]): the mandatory compliance
//!   endpoints, which never acknowledge an unauthenticated delivery.
//!
//! The HTTP server itself is out of scope: every entry point is a plain
//! function over parsed parameters, returning either a value the boundary
//! layer translates into a response ([`embed::SurfaceResponse`],
//! [`auth::AuthRedirect`]) or an error carrying its HTTP status.
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_install::{ApiKey, ApiSecretKey, AppConfig, AppHandle};
//!
//! // Build configuration once at startup (or use AppConfig::from_env())
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .app_handle(AppHandle::new("your-app").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.port(), 3000);
//! ```
//!
//! ## Handling the App URL
//!
//! ```rust
//! use shopify_install::embed::{app_entry, EmbedParams};
//! # use shopify_install::{ApiKey, ApiSecretKey, AppConfig};
//! # let config = AppConfig::builder()
//! #     .api_key(ApiKey::new("key").unwrap())
//! #     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//! #     .build()
//! #     .unwrap();
//!
//! // Parameters come from the GET /app query string
//! let params = EmbedParams {
//!     shop: Some("example.myshopify.com".to_string()),
//!     ..EmbedParams::default()
//! };
//!
//! let response = app_entry(&config, &params);
//! assert_eq!(response.status, 302); // redirect into the admin
//! assert!(response.frame_ancestors.is_some()); // CSP on every /app response
//! ```
//!
//! ## Handling the OAuth Callback
//!
//! ```rust,ignore
//! use shopify_install::auth::{complete_auth_callback, CallbackParams, HttpTokenExchanger};
//!
//! let exchanger = HttpTokenExchanger::new(&config);
//! let params = CallbackParams::new(query_pairs); // raw pairs from the query string
//!
//! match complete_auth_callback(&config, &exchanger, None, &params).await {
//!     Ok(redirect) => {
//!         // 302 to redirect.location
//!     }
//!     Err(e) => {
//!         // respond with e.status(): 400 missing params, 401 bad HMAC,
//!         // 500 exchange failure
//!     }
//! }
//! ```
//!
//! ## Handling Compliance Webhooks
//!
//! ```rust,ignore
//! use shopify_install::webhooks::{acknowledge, ComplianceTopic, WebhookRequest, HEADER_HMAC};
//!
//! // Capture the raw body bytes BEFORE any parsing, for every content type
//! let request = WebhookRequest::new(raw_body, hmac_header);
//!
//! match acknowledge(&config, ComplianceTopic::CustomersRedact, &request) {
//!     Ok(ack) => { /* 200, empty body */ }
//!     Err(e) => { /* 401, nothing else happens */ }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is built once and passed explicitly;
//!   every component is testable with fixture secrets.
//! - **Verification is boolean**: a failed HMAC check is a routine outcome,
//!   never an exception or a panic.
//! - **Stateless requests**: nothing survives a request; the only suspension
//!   point is the outbound token exchange, bounded by an explicit timeout.
//! - **Availability over errors**: a request that cannot be routed gets the
//!   fallback body, not a failure status.

pub mod auth;
pub mod config;
pub mod embed;
pub mod error;
pub mod tenant;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, ApiSecretKey, AppConfig, AppConfigBuilder, AppHandle, ShopDomain};
pub use error::ConfigError;

// Re-export the install-flow types for convenience
pub use auth::{
    complete_auth_callback, AccessToken, AuthRedirect, CallbackError, CallbackParams,
    ExchangeError, HttpTokenExchanger, TokenExchange, TokenResponse, TokenStore,
};
pub use embed::{
    app_entry, decide_navigation, liveness, EmbedParams, NavigationTarget, SurfaceResponse,
};
pub use tenant::{resolve_slug, TenantSlug};
pub use webhooks::{acknowledge, ComplianceTopic, WebhookError, WebhookRequest};
