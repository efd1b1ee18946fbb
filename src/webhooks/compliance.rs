//! Mandatory privacy compliance notifications.
//!
//! The platform delivers three asynchronous compliance notifications to
//! every app. This module authenticates them and produces the
//! acknowledgement; the actual data export and erasure work belongs to an
//! external collaborator. The one guarantee here: an unauthenticated
//! notification is never acknowledged.

use crate::config::AppConfig;
use crate::webhooks::errors::WebhookError;
use crate::webhooks::verification::{verify_request, WebhookRequest};

/// The fixed set of compliance notification topics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceTopic {
    /// A customer requested a copy of their data.
    CustomersDataRequest,
    /// A customer requested erasure of their data.
    CustomersRedact,
    /// The shop uninstalled the app (or requested erasure); all shop data
    /// must go.
    ShopRedact,
}

impl ComplianceTopic {
    /// Every topic, in route-registration order.
    pub const ALL: [Self; 3] = [
        Self::CustomersDataRequest,
        Self::CustomersRedact,
        Self::ShopRedact,
    ];

    /// The route path the platform delivers this topic to.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CustomersDataRequest => "/webhooks/customers/data_request",
            Self::CustomersRedact => "/webhooks/customers/redact",
            Self::ShopRedact => "/webhooks/shop/redact",
        }
    }

    /// Parses a route path back into its topic.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.path() == path)
    }
}

/// A verified, acknowledged compliance notification.
///
/// The response body is empty; only the status matters to the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComplianceAck {
    topic: ComplianceTopic,
}

impl ComplianceAck {
    /// The topic that was acknowledged.
    #[must_use]
    pub const fn topic(self) -> ComplianceTopic {
        self.topic
    }

    /// The HTTP status the boundary layer should respond with.
    #[must_use]
    pub const fn status(self) -> u16 {
        200
    }
}

/// Authenticates a compliance notification and acknowledges it.
///
/// Verification failure yields [`WebhookError::InvalidHmac`] (status 401)
/// and nothing else happens. On success the notification is logged and
/// acknowledged with status 200 — export/erasure execution is the
/// collaborator's job, not this function's.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidHmac`] when the raw-body signature does
/// not validate under any configured secret.
pub fn acknowledge(
    config: &AppConfig,
    topic: ComplianceTopic,
    request: &WebhookRequest,
) -> Result<ComplianceAck, WebhookError> {
    if !verify_request(config, request) {
        tracing::warn!(topic = ?topic, "rejecting unauthenticated compliance notification");
        return Err(WebhookError::InvalidHmac);
    }

    match topic {
        ComplianceTopic::CustomersDataRequest => {
            tracing::info!("customer data request received; forwarding is the operator's concern");
        }
        ComplianceTopic::CustomersRedact => {
            tracing::info!("customer redaction received; erasure is the operator's concern");
        }
        ComplianceTopic::ShopRedact => {
            tracing::info!("shop redaction received; erasure is the operator's concern");
        }
    }

    Ok(ComplianceAck { topic })
}
