//! Configuration types for the Billogram API client.
//!
//! # Overview
//!
//! - [`BillogramConfig`]: The configuration holding credentials and connection options
//! - [`BillogramConfigBuilder`]: A builder for constructing [`BillogramConfig`] instances
//! - [`AuthUser`]: A validated API username
//! - [`AuthKey`]: A validated API key with masked debug output
//! - [`ApiBaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use billogram_api::{BillogramConfig, AuthUser, AuthKey, ApiBaseUrl};
//!
//! let config = BillogramConfig::builder()
//!     .auth_user(AuthUser::new("20561-3vhGtAxH").unwrap())
//!     .auth_key(AuthKey::new("67bd1a5d8f1d2c1e").unwrap())
//!     .api_base(ApiBaseUrl::new("https://sandbox.billogram.com/api/v2").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiBaseUrl, AuthKey, AuthUser};

use std::time::Duration;

use crate::error::ConfigError;

/// Default `User-Agent` header sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    concat!("Billogram API Rust Library/", env!("CARGO_PKG_VERSION"));

/// Configuration for a Billogram API connection.
///
/// Credentials are immutable once the configuration is built.
///
/// # Thread Safety
///
/// `BillogramConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct BillogramConfig {
    auth_user: AuthUser,
    auth_key: AuthKey,
    api_base: ApiBaseUrl,
    user_agent: String,
    timeout: Option<Duration>,
}

impl BillogramConfig {
    /// Creates a configuration with default base URL and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the username or key is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use billogram_api::BillogramConfig;
    ///
    /// let config = BillogramConfig::new("api-user", "api-key").unwrap();
    /// assert_eq!(config.api_base().as_ref(), "https://billogram.com/api/v2");
    /// ```
    pub fn new(auth_user: impl Into<String>, auth_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder()
            .auth_user(AuthUser::new(auth_user)?)
            .auth_key(AuthKey::new(auth_key)?)
            .build()
    }

    /// Creates a new builder for constructing a `BillogramConfig`.
    #[must_use]
    pub fn builder() -> BillogramConfigBuilder {
        BillogramConfigBuilder::new()
    }

    /// Returns the API username.
    #[must_use]
    pub const fn auth_user(&self) -> &AuthUser {
        &self.auth_user
    }

    /// Returns the API authentication key.
    #[must_use]
    pub const fn auth_key(&self) -> &AuthKey {
        &self.auth_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &ApiBaseUrl {
        &self.api_base
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Verify BillogramConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BillogramConfig>();
};

/// Builder for constructing [`BillogramConfig`] instances.
///
/// Required fields are `auth_user` and `auth_key`.
///
/// # Defaults
///
/// - `api_base`: [`ApiBaseUrl::DEFAULT`]
/// - `user_agent`: [`DEFAULT_USER_AGENT`]
/// - `timeout`: `None` (the HTTP stack's own behavior)
#[derive(Debug, Default)]
pub struct BillogramConfigBuilder {
    auth_user: Option<AuthUser>,
    auth_key: Option<AuthKey>,
    api_base: Option<ApiBaseUrl>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl BillogramConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API username (required).
    #[must_use]
    pub fn auth_user(mut self, user: AuthUser) -> Self {
        self.auth_user = Some(user);
        self
    }

    /// Sets the API authentication key (required).
    #[must_use]
    pub fn auth_key(mut self, key: AuthKey) -> Self {
        self.auth_key = Some(key);
        self
    }

    /// Overrides the API base URL, e.g. for a sandbox environment.
    #[must_use]
    pub fn api_base(mut self, api_base: ApiBaseUrl) -> Self {
        self.api_base = Some(api_base);
        self
    }

    /// Overrides the `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a total timeout applied to every request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`BillogramConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `auth_user` or
    /// `auth_key` are not set.
    pub fn build(self) -> Result<BillogramConfig, ConfigError> {
        let auth_user = self
            .auth_user
            .ok_or(ConfigError::MissingRequiredField { field: "auth_user" })?;
        let auth_key = self
            .auth_key
            .ok_or(ConfigError::MissingRequiredField { field: "auth_key" })?;

        Ok(BillogramConfig {
            auth_user,
            auth_key,
            api_base: self.api_base.unwrap_or_default(),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout,
        })
    }
}
