//! Validated newtype wrappers for configuration values.
//!
//! Each wrapper validates its contents on construction so that invalid
//! values are rejected at startup with a clear error, and the rest of the
//! crate can rely on the invariants without re-checking.

use crate::error::ConfigError;
use std::fmt;

/// A validated Shopify API key (the app's client identifier).
///
/// # Example
///
/// ```rust
/// use shopify_install::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key — the shared secret every HMAC in the
/// install flow is keyed with.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying
/// `ApiSecretKey(*****)` so the secret cannot leak into logs.
///
/// # Example
///
/// ```rust
/// use shopify_install::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A validated app handle — the URL slug of the app inside the Shopify
/// admin (`https://admin.shopify.com/store/<slug>/apps/<handle>`).
///
/// Handles are lowercase letters, digits, and hyphens, and may not start
/// or end with a hyphen.
///
/// # Example
///
/// ```rust
/// use shopify_install::AppHandle;
///
/// let handle = AppHandle::new("my-app").unwrap();
/// assert_eq!(handle.as_ref(), "my-app");
/// assert!(AppHandle::new("My App").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppHandle(String);

impl AppHandle {
    /// Creates a new validated app handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAppHandle`] if the handle is empty,
    /// contains characters outside `[a-z0-9-]`, or starts/ends with a hyphen.
    pub fn new(handle: impl Into<String>) -> Result<Self, ConfigError> {
        let handle = handle.into();
        let valid = !handle.is_empty()
            && !handle.starts_with('-')
            && !handle.ends_with('-')
            && handle
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(Self(handle))
        } else {
            Err(ConfigError::InvalidAppHandle { handle })
        }
    }
}

impl AsRef<str> for AppHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated Shopify shop domain.
///
/// Normalizes both accepted formats to the full `shop.myshopify.com` form:
///
/// - `shop-name` → `shop-name.myshopify.com`
/// - `shop-name.myshopify.com` → used as-is
///
/// [`ShopDomain::shop_name`] exposes the name portion, which doubles as the
/// tenant slug when no context token is available.
///
/// # Example
///
/// ```rust
/// use shopify_install::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    /// The platform domain suffix shared by every tenant storefront.
    pub const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let domain = domain.trim().to_lowercase();

        if domain.is_empty() {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        let (shop_name, full_domain) = if let Some(shop_name) = domain.strip_suffix(Self::SUFFIX) {
            (shop_name.to_string(), domain)
        } else if domain.contains('.') {
            // Contains a dot but not the platform suffix
            return Err(ConfigError::InvalidShopDomain { domain });
        } else {
            (domain.clone(), format!("{}{}", domain, Self::SUFFIX))
        };

        if !Self::is_valid_shop_name(&shop_name) {
            return Err(ConfigError::InvalidShopDomain {
                domain: full_domain,
            });
        }

        Ok(Self {
            shop_name_end: shop_name.len(),
            full_domain,
        })
    }

    /// Returns the shop name portion of the domain.
    ///
    /// For `my-store.myshopify.com`, this returns `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }

    fn is_valid_shop_name(name: &str) -> bool {
        if name.is_empty() || name.starts_with('-') || name.ends_with('-') {
            return false;
        }
        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        let result = ApiKey::new("");
        assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_secret_key_masks_value_in_debug() {
        let secret = ApiSecretKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "ApiSecretKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_app_handle_accepts_valid_handles() {
        assert_eq!(AppHandle::new("my-app").unwrap().as_ref(), "my-app");
        assert_eq!(AppHandle::new("app2").unwrap().as_ref(), "app2");
    }

    #[test]
    fn test_app_handle_rejects_invalid_handles() {
        assert!(AppHandle::new("").is_err());
        assert!(AppHandle::new("My App").is_err());
        assert!(AppHandle::new("app_name").is_err());
        assert!(AppHandle::new("-app").is_err());
        assert!(AppHandle::new("app-").is_err());
    }

    #[test]
    fn test_shop_domain_normalizes_short_format() {
        let domain = ShopDomain::new("my-store").unwrap();
        assert_eq!(domain.as_ref(), "my-store.myshopify.com");
        assert_eq!(domain.shop_name(), "my-store");
    }

    #[test]
    fn test_shop_domain_accepts_full_format() {
        let domain = ShopDomain::new("my-store.myshopify.com").unwrap();
        assert_eq!(domain.as_ref(), "my-store.myshopify.com");
        assert_eq!(domain.shop_name(), "my-store");
    }

    #[test]
    fn test_shop_domain_rejects_invalid_domains() {
        assert!(ShopDomain::new("").is_err());
        assert!(ShopDomain::new("my store").is_err());
        assert!(ShopDomain::new("my_store").is_err());
        assert!(ShopDomain::new("MY-STORE").is_ok()); // normalized to lowercase
        assert!(ShopDomain::new("-my-store").is_err());
        assert!(ShopDomain::new("my-store-").is_err());
        assert!(ShopDomain::new("my-store.otherdomain.com").is_err());
    }
}
