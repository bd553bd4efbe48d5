//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Billogram API username.
///
/// # Example
///
/// ```rust
/// use billogram_api::AuthUser;
///
/// let user = AuthUser::new("20561-3vhGtAxH").unwrap();
/// assert_eq!(user.as_ref(), "20561-3vhGtAxH");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser(String);

impl AuthUser {
    /// Creates a new validated API username.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAuthUser`] if the username is empty.
    pub fn new(user: impl Into<String>) -> Result<Self, ConfigError> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(ConfigError::EmptyAuthUser);
        }
        Ok(Self(user))
    }
}

impl AsRef<str> for AuthUser {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Billogram API authentication key.
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only
/// `AuthKey(*****)` instead of the actual value.
///
/// # Example
///
/// ```rust
/// use billogram_api::AuthKey;
///
/// let key = AuthKey::new("67bd1a5d8f1d2c1e3d3e0b4d44c9c5f4").unwrap();
/// assert_eq!(format!("{:?}", key), "AuthKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey(String);

impl AuthKey {
    /// Creates a new validated authentication key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAuthKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyAuthKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for AuthKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(*****)")
    }
}

/// A validated base URL for the Billogram API.
///
/// The URL must use the `http` or `https` scheme and have a non-empty host.
/// Trailing slashes are removed so paths can be appended with a single `/`.
///
/// # Example
///
/// ```rust
/// use billogram_api::ApiBaseUrl;
///
/// let base = ApiBaseUrl::new("https://sandbox.billogram.com/api/v2/").unwrap();
/// assert_eq!(base.as_ref(), "https://sandbox.billogram.com/api/v2");
/// assert_eq!(base.scheme(), "https");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiBaseUrl {
    url: String,
    scheme_end: usize,
}

impl ApiBaseUrl {
    /// The production API endpoint.
    pub const DEFAULT: &'static str = "https://billogram.com/api/v2";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] if the URL is not an absolute
    /// http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidApiBase { url: url.clone() })?;

        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidApiBase { url });
        }

        let host = url[scheme_end + 3..]
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        if host.is_empty() || host.starts_with(':') {
            return Err(ConfigError::InvalidApiBase { url });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Joins a relative API path onto this base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT.to_string(),
            scheme_end: 5,
        }
    }
}

impl AsRef<str> for ApiBaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_rejects_empty_string() {
        assert!(matches!(AuthUser::new(""), Err(ConfigError::EmptyAuthUser)));
        assert!(matches!(AuthUser::new("   "), Err(ConfigError::EmptyAuthUser)));
    }

    #[test]
    fn test_auth_key_rejects_empty_string() {
        assert!(matches!(AuthKey::new(""), Err(ConfigError::EmptyAuthKey)));
    }

    #[test]
    fn test_auth_key_masks_value_in_debug() {
        let key = AuthKey::new("super-secret-key").unwrap();
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "AuthKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_api_base_strips_trailing_slashes() {
        let base = ApiBaseUrl::new("http://localhost:8080/api/v2//").unwrap();
        assert_eq!(base.as_ref(), "http://localhost:8080/api/v2");
        assert_eq!(base.scheme(), "http");
    }

    #[test]
    fn test_api_base_rejects_invalid() {
        assert!(ApiBaseUrl::new("billogram.com/api/v2").is_err());
        assert!(ApiBaseUrl::new("ftp://billogram.com").is_err());
        assert!(ApiBaseUrl::new("https://").is_err());
        assert!(ApiBaseUrl::new("https://:443/api").is_err());
    }

    #[test]
    fn test_api_base_default_is_production() {
        let base = ApiBaseUrl::default();
        assert_eq!(base.as_ref(), "https://billogram.com/api/v2");
        assert_eq!(base.scheme(), "https");
        assert_eq!(base, ApiBaseUrl::new(ApiBaseUrl::DEFAULT).unwrap());
    }

    #[test]
    fn test_api_base_join() {
        let base = ApiBaseUrl::default();
        assert_eq!(
            base.join("billogram/abc/command/send"),
            "https://billogram.com/api/v2/billogram/abc/command/send"
        );
        assert_eq!(base.join("/item"), "https://billogram.com/api/v2/item");
    }
}
