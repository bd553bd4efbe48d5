//! Error types for the Billogram API client.
//!
//! This module contains the configuration error type. Errors produced while
//! talking to the API live in [`crate::clients`] and [`crate::rest`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use billogram_api::{AuthUser, ConfigError};
//!
//! let result = AuthUser::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAuthUser)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API username cannot be empty.
    #[error("API username cannot be empty. API users are created from the Billogram web interface.")]
    EmptyAuthUser,

    /// API authentication key cannot be empty.
    #[error("API authentication key cannot be empty. Please provide the key generated for the API user.")]
    EmptyAuthKey,

    /// API base URL is invalid.
    #[error("Invalid API base URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://billogram.com/api/v2').")]
    InvalidApiBase {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_auth_user_error_message() {
        let message = ConfigError::EmptyAuthUser.to_string();
        assert!(message.contains("username cannot be empty"));
    }

    #[test]
    fn test_invalid_api_base_error_message() {
        let error = ConfigError::InvalidApiBase {
            url: "ftp://nowhere".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://nowhere"));
        assert!(message.contains("http(s)"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "auth_key" };
        let message = error.to_string();
        assert!(message.contains("auth_key"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyAuthKey;
        let _: &dyn std::error::Error = &error;
    }
}
