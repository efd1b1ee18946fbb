//! Tenant identification.
//!
//! Every admin URL this crate builds is rooted at a tenant slug — the store
//! name portion of the tenant's storefront. The slug is derived per request
//! and never persisted; see [`resolve_slug`] for the derivation order.

use base64::engine::general_purpose::{STANDARD as BASE64_STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;

use crate::config::ShopDomain;

/// Path segment preceding the tenant slug in decoded context tokens.
const STORE_SEGMENT: &str = "store";

/// A derived tenant storefront identifier.
///
/// Immutable once computed; scoped to a single request.
///
/// # Example
///
/// ```rust
/// use shopify_install::tenant::resolve_slug;
///
/// let slug = resolve_slug(Some("acme.myshopify.com"), None).unwrap();
/// assert_eq!(slug.as_ref(), "acme");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantSlug(String);

impl AsRef<str> for TenantSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the tenant slug from the request's `shop` and `host` parameters.
///
/// The `host` context token wins when it yields a slug: it is the
/// platform-issued, base64-encoded admin location
/// (`admin.shopify.com/store/<slug>`) and survives domain renames. The
/// `shop` domain minus its `.myshopify.com` suffix is the fallback. `None`
/// means neither source carries enough information to navigate.
///
/// Malformed tokens — bad base64, non-UTF-8 bytes, no `store` path segment —
/// are recovered locally as "no slug from token", never an error. The
/// function is pure and idempotent.
#[must_use]
pub fn resolve_slug(shop: Option<&str>, host: Option<&str>) -> Option<TenantSlug> {
    if let Some(slug) = host.and_then(slug_from_context_token) {
        return Some(slug);
    }
    shop.and_then(|domain| {
        ShopDomain::new(domain)
            .ok()
            .map(|d| TenantSlug(d.shop_name().to_string()))
    })
}

/// Extracts the slug from a base64 context token, if it yields one.
///
/// The decoded text is usually scheme-less (`admin.shopify.com/store/acme`);
/// a default scheme is prepended before locating the path.
fn slug_from_context_token(token: &str) -> Option<TenantSlug> {
    // The platform is inconsistent about padding, so accept both forms.
    let decoded = BASE64_STANDARD
        .decode(token)
        .or_else(|_| STANDARD_NO_PAD.decode(token))
        .ok()?;
    let text = String::from_utf8(decoded).ok()?;

    let with_scheme = if text.contains("://") {
        text
    } else {
        format!("https://{text}")
    };

    let scheme_end = with_scheme.find("://")?;
    let rest = &with_scheme[scheme_end + 3..];
    let path = rest.split(['?', '#']).next().unwrap_or(rest);

    // First element is the authority, the remainder are path segments.
    let segments: Vec<&str> = path.split('/').skip(1).filter(|s| !s.is_empty()).collect();
    let store_index = segments.iter().position(|s| *s == STORE_SEGMENT)?;
    segments
        .get(store_index + 1)
        .map(|slug| TenantSlug((*slug).to_string()))
}
