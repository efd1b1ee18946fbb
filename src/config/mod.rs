//! Process configuration.
//!
//! Configuration is an immutable value constructed once at process start and
//! passed explicitly to every component — the HMAC verifiers and flow
//! controllers never read ambient global state, which keeps them testable
//! with fixture secrets.
//!
//! # Overview
//!
//! - [`AppConfig`]: the configuration value holding all settings
//! - [`AppConfigBuilder`]: builder for constructing [`AppConfig`] instances
//! - [`AppConfig::from_env`]: one-shot environment loading for deployments
//! - [`ApiKey`], [`ApiSecretKey`], [`AppHandle`], [`ShopDomain`]: validated
//!   newtypes
//!
//! # Example
//!
//! ```rust
//! use shopify_install::{ApiKey, ApiSecretKey, AppConfig, AppHandle};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .app_handle(AppHandle::new("my-app").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.app_handle().as_ref(), "my-app");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, AppHandle, ShopDomain};

use crate::error::ConfigError;

/// Environment variable holding the app's API key.
pub const ENV_API_KEY: &str = "SHOPIFY_API_KEY";
/// Environment variable holding the app's API secret key.
pub const ENV_API_SECRET: &str = "SHOPIFY_API_SECRET";
/// Environment variable holding the previous API secret key during rotation.
pub const ENV_OLD_API_SECRET: &str = "SHOPIFY_OLD_API_SECRET";
/// Environment variable holding the app handle.
pub const ENV_APP_HANDLE: &str = "SHOPIFY_APP_HANDLE";
/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";

/// App handle used when [`ENV_APP_HANDLE`] is unset.
pub const DEFAULT_APP_HANDLE: &str = "app";
/// Listen port used when [`ENV_PORT`] is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Immutable process configuration for the install flow.
///
/// Holds the app credentials, the admin app handle, and the listen port the
/// hosting HTTP layer should bind. `Clone + Send + Sync`, safe to share
/// across async tasks.
///
/// # Key Rotation
///
/// `old_api_secret_key` supports seamless secret rotation: HMAC validation
/// tries the primary key first and falls back to the old key if configured,
/// so in-flight installs and webhooks keep validating across a rotation.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    app_handle: AppHandle,
    port: u16,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    ///
    /// Reads [`ENV_API_KEY`] and [`ENV_API_SECRET`] (required),
    /// [`ENV_OLD_API_SECRET`] (optional), [`ENV_APP_HANDLE`] (defaults to
    /// [`DEFAULT_APP_HANDLE`]), and [`ENV_PORT`] (defaults to
    /// [`DEFAULT_PORT`]). Intended to be called exactly once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary lookup function.
    ///
    /// This is what [`AppConfig::from_env`] delegates to; tests supply a
    /// closure instead of mutating the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or(ConfigError::MissingEnvVar { name: ENV_API_KEY })
            .and_then(ApiKey::new)?;
        let api_secret_key = lookup(ENV_API_SECRET)
            .ok_or(ConfigError::MissingEnvVar {
                name: ENV_API_SECRET,
            })
            .and_then(ApiSecretKey::new)?;
        let old_api_secret_key = lookup(ENV_OLD_API_SECRET)
            .map(ApiSecretKey::new)
            .transpose()?;
        let app_handle = match lookup(ENV_APP_HANDLE) {
            Some(handle) => AppHandle::new(handle)?,
            None => AppHandle::new(DEFAULT_APP_HANDLE)?,
        };
        let port = match lookup(ENV_PORT) {
            Some(value) => value
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        let mut builder = Self::builder()
            .api_key(api_key)
            .api_secret_key(api_secret_key)
            .app_handle(app_handle)
            .port(port);
        if let Some(old) = old_api_secret_key {
            builder = builder.old_api_secret_key(old);
        }
        builder.build()
    }

    /// Returns the API key (client identifier).
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the old API secret key, if configured for rotation.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the app handle.
    #[must_use]
    pub const fn app_handle(&self) -> &AppHandle {
        &self.app_handle
    }

    /// Returns the listen port for the hosting HTTP layer.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

/// Builder for [`AppConfig`].
///
/// `api_key` and `api_secret_key` are required; `app_handle` defaults to
/// [`DEFAULT_APP_HANDLE`] and `port` to [`DEFAULT_PORT`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    app_handle: Option<AppHandle>,
    port: Option<u16>,
}

impl AppConfigBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the API secret key.
    #[must_use]
    pub fn api_secret_key(mut self, api_secret_key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(api_secret_key);
        self
    }

    /// Sets the old API secret key used during key rotation.
    #[must_use]
    pub fn old_api_secret_key(mut self, old_api_secret_key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(old_api_secret_key);
        self
    }

    /// Sets the app handle.
    #[must_use]
    pub fn app_handle(mut self, app_handle: AppHandle) -> Self {
        self.app_handle = Some(app_handle);
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `api_secret_key` was not set.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self.api_secret_key.ok_or(ConfigError::MissingRequiredField {
            field: "api_secret_key",
        })?;
        let app_handle = match self.app_handle {
            Some(handle) => handle,
            None => AppHandle::new(DEFAULT_APP_HANDLE)?,
        };

        Ok(AppConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            app_handle,
            port: self.port.unwrap_or(DEFAULT_PORT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = AppConfig::builder()
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_requires_api_secret_key() {
        let result = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "api_secret_key"
            })
        ));
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.app_handle().as_ref(), DEFAULT_APP_HANDLE);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(config.old_api_secret_key().is_none());
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .old_api_secret_key(ApiSecretKey::new("old-secret").unwrap())
            .app_handle(AppHandle::new("demo").unwrap())
            .port(8080)
            .build()
            .unwrap();

        assert_eq!(config.api_key().as_ref(), "key");
        assert_eq!(config.app_handle().as_ref(), "demo");
        assert_eq!(config.port(), 8080);
        assert!(config.old_api_secret_key().is_some());
    }

    #[test]
    fn test_from_env_lookup_with_full_environment() {
        let env = [
            (ENV_API_KEY, "env-key"),
            (ENV_API_SECRET, "env-secret"),
            (ENV_OLD_API_SECRET, "env-old-secret"),
            (ENV_APP_HANDLE, "demo"),
            (ENV_PORT, "8080"),
        ];
        let config = AppConfig::from_env_lookup(lookup_from(&env)).unwrap();

        assert_eq!(config.api_key().as_ref(), "env-key");
        assert_eq!(config.api_secret_key().as_ref(), "env-secret");
        assert_eq!(
            config.old_api_secret_key().map(AsRef::as_ref),
            Some("env-old-secret")
        );
        assert_eq!(config.app_handle().as_ref(), "demo");
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_from_env_lookup_applies_defaults() {
        let env = [(ENV_API_KEY, "k"), (ENV_API_SECRET, "s")];
        let config = AppConfig::from_env_lookup(lookup_from(&env)).unwrap();

        assert_eq!(config.app_handle().as_ref(), DEFAULT_APP_HANDLE);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(config.old_api_secret_key().is_none());
    }

    #[test]
    fn test_from_env_lookup_missing_secret_fails() {
        let env = [(ENV_API_KEY, "k")];
        let result = AppConfig::from_env_lookup(lookup_from(&env));
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar {
                name: ENV_API_SECRET
            })
        ));
    }

    #[test]
    fn test_from_env_lookup_rejects_bad_port() {
        let env = [(ENV_API_KEY, "k"), (ENV_API_SECRET, "s"), (ENV_PORT, "eighty")];
        let result = AppConfig::from_env_lookup(lookup_from(&env));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));

        let env = [(ENV_API_KEY, "k"), (ENV_API_SECRET, "s"), (ENV_PORT, "0")];
        let result = AppConfig::from_env_lookup(lookup_from(&env));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn test_config_can_be_cloned_and_shared() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .build()
            .unwrap();
        let clone = config.clone();
        assert_eq!(clone.api_key().as_ref(), config.api_key().as_ref());

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppConfig>();
    }
}
