//! Authentication for the install flow.
//!
//! Two concerns live here:
//!
//! - **Signature verification** ([`hmac`]): the query-string and raw-body
//!   HMAC schemes shared by the OAuth callback and the webhook routes.
//! - **Callback completion** ([`complete_auth_callback`]): the state machine
//!   behind `GET /auth/callback` — parameter checks, signature validation,
//!   the single token-exchange call, and the post-authorization redirect.
//!
//! The outbound token exchange is a collaborator behind the
//! [`TokenExchange`] trait; [`HttpTokenExchanger`] is the shipped
//! implementation. Obtained tokens can be handed to a [`TokenStore`] before
//! they are dropped.
//!
//! # Security Notes
//!
//! - All signature comparisons are constant-time.
//! - Verification failure is a boolean outcome, not an exception — the
//!   error enums here mark flow decisions (400/401/500), not panics.
//! - Old-secret fallback keeps in-flight installs valid across key rotation.

pub mod hmac;

mod callback;
mod token_exchange;

pub use callback::{complete_auth_callback, AuthRedirect, CallbackError, CallbackParams};
pub use token_exchange::{
    AccessToken, ExchangeError, HttpTokenExchanger, TokenExchange, TokenResponse, TokenStore,
    TokenStoreError, TOKEN_EXCHANGE_TIMEOUT,
};
