//! Navigation decisions for the embedded app surface.
//!
//! `GET /app` is hit in several distinct situations — the platform's
//! automated install verification (with and without the embedded flag), the
//! browser's first top-level visit, and the in-iframe load — and each needs
//! a different answer: a redirect to the consent/grant surface, a redirect
//! to the hosted app surface, the embedded page itself, or a fallback body.
//!
//! [`decide_navigation`] is a pure function over the request parameters that
//! returns a tagged [`NavigationTarget`]; [`respond`] translates the target
//! into a framework-agnostic [`SurfaceResponse`] the HTTP boundary emits
//! 1:1. Keeping the decision separate from the response makes the rule
//! precedence auditable and unit-testable without HTTP.

use crate::config::{AppConfig, AppHandle};
use crate::tenant::{resolve_slug, TenantSlug};

/// Host of the platform's admin console.
pub const ADMIN_HOST: &str = "admin.shopify.com";

/// Response header carrying the framing policy.
pub const CSP_HEADER_NAME: &str = "Content-Security-Policy";

/// Framing policy for every `/app` response: the admin console and tenant
/// storefront subdomains may embed us, nothing else. No `X-Frame-Options`
/// header may be present on this route — it would override this policy and
/// block the iframe.
pub const FRAME_ANCESTORS_POLICY: &str =
    "frame-ancestors https://admin.shopify.com https://*.myshopify.com;";

/// Page served for in-iframe loads.
const EMBEDDED_PAGE_HTML: &str = "<!doctype html>\n<html>\n  <head>\n    <meta charset=\"utf-8\" />\n    <title>App</title>\n  </head>\n  <body>\n    <p>App is ready.</p>\n  </body>\n</html>\n";

/// Body served when the request lacks enough information to navigate.
const FALLBACK_BODY: &str = "App is installed \u{2714}";

/// Body of the liveness marker on `GET /`.
const LIVENESS_BODY: &str = "OAuth install service is running \u{2714}";

/// Query parameters of `GET /app`.
///
/// All fields are optional; empty strings count as absent, matching the
/// platform's own handling of these parameters.
#[derive(Clone, Debug, Default)]
pub struct EmbedParams {
    /// The `shop` tenant domain.
    pub shop: Option<String>,
    /// The `host` context token.
    pub host: Option<String>,
    /// The `hmac` query signature.
    pub hmac: Option<String>,
    /// The `embedded` flag (`"1"` when loading inside the iframe).
    pub embedded: Option<String>,
}

impl EmbedParams {
    fn shop(&self) -> Option<&str> {
        non_empty(self.shop.as_deref())
    }

    fn host(&self) -> Option<&str> {
        non_empty(self.host.as_deref())
    }

    fn hmac(&self) -> Option<&str> {
        non_empty(self.hmac.as_deref())
    }

    fn is_embedded(&self) -> bool {
        non_empty(self.embedded.as_deref()) == Some("1")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Where the browser goes next.
///
/// Output of [`decide_navigation`]; consumed by [`respond`]. Never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Top-level redirect to the platform's consent/grant surface, so the
    /// platform can establish first-party cookies before the iframe loads.
    ConsentRedirect {
        /// Tenant the grant page belongs to.
        slug: TenantSlug,
        /// The `shop` domain, forwarded on the grant URL.
        shop: String,
        /// The context token, forwarded when present.
        host: Option<String>,
    },
    /// Redirect to the tenant's hosted app surface.
    AppSurfaceRedirect {
        /// Tenant whose admin hosts the app.
        slug: TenantSlug,
        /// The context token, forwarded when present.
        host: Option<String>,
    },
    /// Serve the in-iframe page directly. A navigation redirect from inside
    /// an embedded context would be rejected or looped by the platform.
    EmbeddedRender,
    /// Serve the minimal acknowledgement body.
    FallbackRender,
}

/// Decides the navigation target for `GET /app`.
///
/// An ordered rule list; the first matching rule wins. The ordering is
/// load-bearing: the consent rules must precede the app-surface rule because
/// a present `hmac` (or an absent embedded flag) signals "establish the
/// top-level session first", not "show the app" — and the platform's install
/// verification probes both shapes.
#[must_use]
pub fn decide_navigation(params: &EmbedParams) -> NavigationTarget {
    let shop = params.shop();
    let host = params.host();
    let slug = resolve_slug(shop, host);

    // Rules 1 and 2: slug, shop, and host all present.
    if let (Some(slug), Some(shop), Some(host)) = (slug.as_ref(), shop, host) {
        // Rule 1: a signed request always goes to the grant surface.
        if params.hmac().is_some() {
            return NavigationTarget::ConsentRedirect {
                slug: slug.clone(),
                shop: shop.to_string(),
                host: Some(host.to_string()),
            };
        }
        // Rule 2: unsigned, but not yet inside the iframe.
        if !params.is_embedded() {
            return NavigationTarget::ConsentRedirect {
                slug: slug.clone(),
                shop: shop.to_string(),
                host: Some(host.to_string()),
            };
        }
    }

    // Rule 3: already embedded; serve the page in place.
    if params.is_embedded() {
        return NavigationTarget::EmbeddedRender;
    }

    // Rule 4: enough information to reach the hosted app surface.
    if let (Some(slug), Some(_)) = (slug, shop) {
        return NavigationTarget::AppSurfaceRedirect {
            slug,
            host: host.map(ToString::to_string),
        };
    }

    // Rule 5: nothing to navigate with.
    NavigationTarget::FallbackRender
}

/// Builds the consent/grant URL for a tenant.
#[must_use]
pub fn consent_url(slug: &TenantSlug, shop: &str, host: Option<&str>) -> String {
    let mut url = format!(
        "https://{ADMIN_HOST}/store/{slug}/app/grant?shop={}",
        urlencoding::encode(shop)
    );
    if let Some(host) = host {
        url.push_str("&host=");
        url.push_str(&urlencoding::encode(host));
    }
    url
}

/// Builds the hosted app surface URL for a tenant.
#[must_use]
pub fn app_surface_url(slug: &TenantSlug, handle: &AppHandle, host: Option<&str>) -> String {
    let mut url = format!("https://{ADMIN_HOST}/store/{slug}/apps/{handle}");
    if let Some(host) = host {
        url.push_str("?host=");
        url.push_str(&urlencoding::encode(host));
    }
    url
}

/// A framework-agnostic HTTP response description.
///
/// The boundary layer translates this 1:1: emit `status`, set the
/// `Location` header when present, set [`CSP_HEADER_NAME`] to
/// `frame_ancestors` when present, and write `body` with `content_type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Redirect target for the `Location` header, if any.
    pub location: Option<String>,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// Response body (empty on redirects).
    pub body: String,
    /// Value for [`CSP_HEADER_NAME`], when the route requires one.
    pub frame_ancestors: Option<&'static str>,
}

impl SurfaceResponse {
    fn redirect(location: String) -> Self {
        Self {
            status: 302,
            location: Some(location),
            content_type: "text/html; charset=utf-8",
            body: String::new(),
            frame_ancestors: Some(FRAME_ANCESTORS_POLICY),
        }
    }

    fn html(body: &str) -> Self {
        Self {
            status: 200,
            location: None,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
            frame_ancestors: Some(FRAME_ANCESTORS_POLICY),
        }
    }

    fn text(body: &str) -> Self {
        Self {
            status: 200,
            location: None,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
            frame_ancestors: Some(FRAME_ANCESTORS_POLICY),
        }
    }
}

/// Translates a [`NavigationTarget`] into the response to emit.
#[must_use]
pub fn respond(target: &NavigationTarget, config: &AppConfig) -> SurfaceResponse {
    match target {
        NavigationTarget::ConsentRedirect { slug, shop, host } => {
            SurfaceResponse::redirect(consent_url(slug, shop, host.as_deref()))
        }
        NavigationTarget::AppSurfaceRedirect { slug, host } => SurfaceResponse::redirect(
            app_surface_url(slug, config.app_handle(), host.as_deref()),
        ),
        NavigationTarget::EmbeddedRender => SurfaceResponse::html(EMBEDDED_PAGE_HTML),
        NavigationTarget::FallbackRender => SurfaceResponse::text(FALLBACK_BODY),
    }
}

/// Entry point for `GET /app`: decide, then respond.
#[must_use]
pub fn app_entry(config: &AppConfig, params: &EmbedParams) -> SurfaceResponse {
    let target = decide_navigation(params);
    tracing::debug!(decision = ?target, "app entry navigation decided");
    respond(&target, config)
}

/// Entry point for `GET /`: the plain-text liveness marker.
#[must_use]
pub fn liveness() -> SurfaceResponse {
    SurfaceResponse {
        status: 200,
        location: None,
        content_type: "text/plain; charset=utf-8",
        body: LIVENESS_BODY.to_string(),
        frame_ancestors: None,
    }
}
