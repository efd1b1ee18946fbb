//! OAuth callback validation and completion.
//!
//! [`complete_auth_callback`] is the single-pass state machine behind
//! `GET /auth/callback`: `Received → Validated → Exchanged → Redirecting`,
//! or a terminal [`CallbackError`]. Each invocation is independent; no state
//! survives the request, and the external token exchange is called exactly
//! once with no retries — the platform-driven browser is the retry path.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_install::auth::{complete_auth_callback, CallbackParams, HttpTokenExchanger};
//!
//! let exchanger = HttpTokenExchanger::new(&config);
//! let params = CallbackParams::new(query_pairs); // from the request query string
//!
//! match complete_auth_callback(&config, &exchanger, None, &params).await {
//!     Ok(redirect) => { /* 302 to redirect.location */ }
//!     Err(e) => { /* respond with e.status() */ }
//! }
//! ```

use thiserror::Error;

use crate::auth::hmac::verify_query_hmac;
use crate::auth::token_exchange::{ExchangeError, TokenExchange, TokenStore};
use crate::config::AppConfig;
use crate::embed::app_surface_url;
use crate::tenant::resolve_slug;

/// Query parameters of an OAuth callback, exactly as received.
///
/// Pairs are kept in arrival order with their raw values — the HMAC
/// canonicalization signs values as the query parser produced them, so
/// nothing here is normalized or re-encoded. Extra parameters beyond the
/// well-known ones participate in verification like any other pair.
#[derive(Clone, Debug, Default)]
pub struct CallbackParams {
    pairs: Vec<(String, String)>,
}

impl CallbackParams {
    /// Wraps parsed query pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Returns all pairs in arrival order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns the first value for `key`, treating empty values as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// The `shop` tenant domain, if present.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// The `code` authorization code, if present.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// The `host` context token, if present.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get("host")
    }

    fn required(&self, name: &'static str) -> Result<&str, CallbackError> {
        self.get(name)
            .ok_or(CallbackError::MissingParameter { name })
    }
}

/// Terminal failure states of the callback flow.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// A required callback parameter (`shop`, `code`, or `hmac`) is absent.
    #[error("missing required OAuth parameter '{name}'")]
    MissingParameter {
        /// The name of the missing parameter.
        name: &'static str,
    },

    /// The query-scheme HMAC did not validate under any configured secret.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The token exchange answered successfully but carried no access token.
    #[error("token exchange succeeded but returned no access token")]
    ExchangeFailed,

    /// The token-exchange collaborator failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// No tenant slug could be derived for the post-authorization redirect.
    ///
    /// Unreachable with [`HttpTokenExchanger`], which validates the shop
    /// domain before any redirect is computed; a non-validating test double
    /// can land here.
    ///
    /// [`HttpTokenExchanger`]: crate::auth::HttpTokenExchanger
    #[error("no tenant slug could be derived for the post-authorization redirect")]
    Unroutable,
}

impl CallbackError {
    /// The HTTP status the boundary layer should respond with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::MissingParameter { .. } => 400,
            Self::InvalidHmac => 401,
            Self::ExchangeFailed | Self::Exchange(_) | Self::Unroutable => 500,
        }
    }
}

/// The successful outcome of the callback flow: a redirect to the tenant's
/// hosted app surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRedirect {
    /// Absolute URL the browser should be sent to.
    pub location: String,
}

impl AuthRedirect {
    /// The HTTP status the boundary layer should respond with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        302
    }
}

/// Validates an OAuth callback, exchanges the code, and computes the
/// post-authorization redirect.
///
/// 1. **Received**: `shop`, `code`, and `hmac` must all be present
///    (status 400 otherwise).
/// 2. **Validated**: the query HMAC is verified over every received
///    parameter except `hmac` itself — the `host` token is included
///    (status 401 on mismatch).
/// 3. **Exchanged**: the collaborator is invoked exactly once. A response
///    without a token and a failed call both map to status 500; neither is
///    retried here.
/// 4. **Redirecting**: the tenant slug is resolved and the browser is sent
///    to the hosted app surface — never back to the consent screen — with
///    the context token carried forward when one was present. The obtained
///    token goes to `store` (when supplied) and is then dropped; a store
///    failure is logged and does not fail the redirect.
///
/// # Errors
///
/// See [`CallbackError`]; `CallbackError::status()` gives the HTTP mapping.
pub async fn complete_auth_callback(
    config: &AppConfig,
    exchanger: &dyn TokenExchange,
    store: Option<&dyn TokenStore>,
    params: &CallbackParams,
) -> Result<AuthRedirect, CallbackError> {
    // Step 1: required parameters
    let shop = params.required("shop")?;
    let code = params.required("code")?;
    params.required("hmac")?;

    // Step 2: verify the query signature before anything leaves the process
    if !verify_query_hmac(params.pairs(), config) {
        tracing::warn!(shop, "rejecting auth callback: HMAC mismatch");
        return Err(CallbackError::InvalidHmac);
    }

    // Step 3: exactly one exchange call
    let token_response = exchanger.exchange(shop, code).await?;
    let Some(token) = token_response.access_token else {
        tracing::warn!(shop, "token exchange answered without an access token");
        return Err(CallbackError::ExchangeFailed);
    };

    // Step 4: compute the redirect target
    let host = params.host();
    let slug = resolve_slug(Some(shop), host).ok_or(CallbackError::Unroutable)?;

    if let Some(store) = store {
        if let Err(e) = store.save(&slug, &token).await {
            tracing::warn!(error = %e, slug = %slug, "token store failed; continuing with redirect");
        }
    }

    let location = app_surface_url(&slug, config.app_handle(), host);
    tracing::debug!(slug = %slug, "auth callback complete, redirecting to app surface");
    Ok(AuthRedirect { location })
}
