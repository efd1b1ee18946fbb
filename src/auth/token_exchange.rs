//! The outbound token-exchange collaborator.
//!
//! The authorization flow controller does not speak HTTP itself; it invokes
//! a [`TokenExchange`] implementation exactly once per callback. The shipped
//! [`HttpTokenExchanger`] POSTs the app credentials and authorization code
//! to the tenant's token endpoint; tests substitute a double to observe call
//! counts and control outcomes.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_install::auth::{HttpTokenExchanger, TokenExchange};
//!
//! let exchanger = HttpTokenExchanger::new(&config);
//! let response = exchanger.exchange("example.myshopify.com", "auth-code").await?;
//! match response.access_token {
//!     Some(token) => println!("token obtained"),
//!     None => println!("exchange succeeded but returned no token"),
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ApiKey, ApiSecretKey, AppConfig, ShopDomain};
use crate::tenant::TenantSlug;

/// Explicit per-request timeout on the outbound exchange call.
///
/// A hung upstream otherwise blocks the one in-flight request until the
/// client gives up; ten seconds is far beyond the endpoint's normal latency.
pub const TOKEN_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

const TOKEN_ENDPOINT_PATH: &str = "/admin/oauth/access_token";

/// An access token obtained from the token exchange.
///
/// Opaque credential; created on a successful exchange, handed to an
/// optional [`TokenStore`], and dropped when the response is emitted.
/// `Debug` masks the value so tokens cannot leak into logs.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// Body of a successful token-endpoint response.
///
/// `access_token` is optional on purpose: the platform has been observed to
/// answer 200 without a token, and that case is the caller's
/// `ExchangeFailed`, not a deserialization error.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// The access token, when the exchange actually produced one.
    #[serde(default)]
    pub access_token: Option<AccessToken>,
    /// Comma-separated scopes granted alongside the token.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Errors from a token-exchange collaborator.
///
/// All variants surface to the browser as status 500; none are retried by
/// the flow controller — the platform-driven browser restarts the
/// authorization flow instead.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The shop parameter is not a valid tenant domain.
    #[error("invalid shop domain '{domain}' for token exchange")]
    InvalidShopDomain {
        /// The rejected domain value.
        domain: String,
    },

    /// The outbound call failed before an HTTP response arrived.
    #[error("token exchange transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The token endpoint answered with a non-success status.
    #[error("token exchange failed with status {status}: {message}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, if readable.
        message: String,
    },

    /// The token endpoint answered 200 with an unparseable body.
    #[error("token exchange returned a malformed response: {message}")]
    MalformedResponse {
        /// Description of the parse failure.
        message: String,
    },
}

/// The external token-exchange collaborator seam.
///
/// Exactly one call is made per authorization callback. Implementations
/// must not retry internally; an authorization code is single-use and a
/// reused code is expected to fail at the upstream, not to be repaired here.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchanges an authorization code for an access token.
    async fn exchange(&self, shop: &str, code: &str) -> Result<TokenResponse, ExchangeError>;
}

/// Error returned by a [`TokenStore`] implementation.
#[derive(Debug, Error)]
#[error("token store failure: {message}")]
pub struct TokenStoreError {
    /// Description of the store failure.
    pub message: String,
}

/// Optional persistence seam for obtained access tokens.
///
/// The flow controller calls `save` when a store is supplied and logs (but
/// does not fail on) store errors: the redirect must still happen, and a
/// lost token re-acquires on the next authorization pass. No storage schema
/// is assumed.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Associates an access token with a tenant.
    async fn save(&self, slug: &TenantSlug, token: &AccessToken) -> Result<(), TokenStoreError>;
}

/// Request body for the token endpoint.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Reqwest-backed [`TokenExchange`] implementation.
///
/// Builds the endpoint URL from the validated shop domain
/// (`https://<shop>/admin/oauth/access_token`). [`with_base_url`] replaces
/// the scheme-and-authority part, which is how the wiremock tests (and any
/// forward proxy deployment) point the exchange elsewhere.
///
/// [`with_base_url`]: HttpTokenExchanger::with_base_url
pub struct HttpTokenExchanger {
    client: reqwest::Client,
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    base_url: Option<String>,
}

impl HttpTokenExchanger {
    /// Creates an exchanger using the app credentials from `config`.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key().clone(),
            api_secret_key: config.api_secret_key().clone(),
            base_url: None,
        }
    }

    /// Overrides the scheme-and-authority of the token endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn token_url(&self, shop: &ShopDomain) -> String {
        self.base_url.as_ref().map_or_else(
            || format!("https://{}{TOKEN_ENDPOINT_PATH}", shop.as_ref()),
            |base| format!("{}{TOKEN_ENDPOINT_PATH}", base.trim_end_matches('/')),
        )
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchanger {
    async fn exchange(&self, shop: &str, code: &str) -> Result<TokenResponse, ExchangeError> {
        let shop = ShopDomain::new(shop).map_err(|_| ExchangeError::InvalidShopDomain {
            domain: shop.to_string(),
        })?;

        let request_body = TokenExchangeRequest {
            client_id: self.api_key.as_ref(),
            client_secret: self.api_secret_key.as_ref(),
            code,
        };

        let response = self
            .client
            .post(self.token_url(&shop))
            .timeout(TOKEN_EXCHANGE_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status, "token exchange rejected by upstream");
            return Err(ExchangeError::Status { status, message });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ExchangeError::MalformedResponse {
                message: e.to_string(),
            })
    }
}

// Verify collaborator types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ExchangeError>();
    assert_send_sync::<HttpTokenExchanger>();
    assert_send_sync::<AccessToken>();
};
