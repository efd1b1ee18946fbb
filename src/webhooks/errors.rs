//! Webhook error types.

use thiserror::Error;

/// Errors from webhook authentication.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The raw-body HMAC did not validate under any configured secret.
    ///
    /// The delivery must be answered 401 and nothing else may happen —
    /// an unauthenticated notification is never acknowledged.
    #[error("webhook HMAC verification failed")]
    InvalidHmac,
}

impl WebhookError {
    /// The HTTP status the boundary layer should respond with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidHmac => 401,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_hmac_maps_to_401() {
        assert_eq!(WebhookError::InvalidHmac.status(), 401);
    }

    #[test]
    fn test_error_implements_std_error() {
        let _: &dyn std::error::Error = &WebhookError::InvalidHmac;
    }
}
