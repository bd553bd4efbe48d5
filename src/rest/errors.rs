//! Error types for remote object operations.
//!
//! [`ResourceError`] wraps transport errors ([`HttpError`]) and adds the
//! failures that can happen locally in the object model: contract violations
//! caught before any request is made, absent fields, and undecodable content.
//!
//! # Example
//!
//! ```rust,ignore
//! use billogram_api::rest::ResourceError;
//! use billogram_api::clients::ApiError;
//!
//! match billogram.create_payment(-5.0).await {
//!     Err(ResourceError::InvalidArgument { argument, reason }) => {
//!         println!("bad {argument}: {reason}");  // no request was sent
//!     }
//!     Err(e) if e.api_error().is_some_and(ApiError::is_request_data_error) => {
//!         println!("the server rejected the payment: {e}");
//!     }
//!     Err(e) => println!("other failure: {e}"),
//!     Ok(_) => println!("paid"),
//! }
//! ```

use crate::clients::{ApiError, HttpError};
use thiserror::Error;

/// Error type for remote object operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An argument failed local validation. No request was sent.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// The name of the offending argument.
        argument: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// A field was read that the object's snapshot does not contain.
    #[error("Field '{field}' is not present on {object}")]
    FieldAbsent {
        /// The requested field name.
        field: String,
        /// The path of the object that was read.
        object: String,
    },

    /// A snapshot was read before it was ever fetched.
    #[error("{object} has not been loaded yet")]
    NotLoaded {
        /// The path of the object that was read.
        object: String,
    },

    /// An object's snapshot has no value for its identifying field, so its
    /// path cannot be built.
    #[error("Object of type '{object_type}' has no value for id field '{id_field}'")]
    MissingId {
        /// The url name of the object type.
        object_type: &'static str,
        /// The identifying field that was missing.
        id_field: &'static str,
    },

    /// The API answered with data of an unexpected shape.
    #[error("Unexpected response data: {0}")]
    InvalidResponse(String),

    /// Request data could not be serialized or a snapshot could not be
    /// decoded into the requested type.
    #[error("JSON conversion failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base64 content returned by the API could not be decoded.
    #[error("Failed to decode document content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A local file could not be read.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The compensating delete after a failed create-and-send failed too.
    ///
    /// The source is the original error. The object created on the server
    /// may still exist.
    #[error("Failed to remove object '{object_id}' after a failed send ({cleanup}); original error: {source}")]
    CompensationFailed {
        /// The id of the object that could not be removed.
        object_id: String,
        /// The error that made the operation fail.
        #[source]
        source: Box<ResourceError>,
        /// The error returned by the compensating delete.
        cleanup: Box<ResourceError>,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
    #[must_use]
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Returns the classified API error behind this error, if any.
    ///
    /// For [`CompensationFailed`](Self::CompensationFailed) this is the
    /// original error's API error.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Http(e) => e.as_api_error(),
            Self::CompensationFailed { source, .. } => source.api_error(),
            _ => None,
        }
    }

    /// Returns `true` if this error was raised locally, before any request.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::FieldAbsent { .. }
                | Self::NotLoaded { .. }
                | Self::MissingId { .. }
                | Self::Io(_)
        )
    }
}

impl From<ApiError> for ResourceError {
    fn from(error: ApiError) -> Self {
        Self::Http(HttpError::Api(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorDetails;

    #[test]
    fn test_invalid_argument_message() {
        let error = ResourceError::invalid_argument("amount", "must be positive");
        assert_eq!(error.to_string(), "Invalid argument 'amount': must be positive");
        assert!(error.is_local());
        assert!(error.api_error().is_none());
    }

    #[test]
    fn test_field_absent_message() {
        let error = ResourceError::FieldAbsent {
            field: "due_date".to_string(),
            object: "billogram/abc".to_string(),
        };
        assert!(error.to_string().contains("due_date"));
        assert!(error.to_string().contains("billogram/abc"));
    }

    #[test]
    fn test_api_error_is_reachable() {
        let error: ResourceError =
            ApiError::InvalidObjectState(ErrorDetails::new("Already sent")).into();
        assert!(!error.is_local());
        assert!(matches!(
            error.api_error(),
            Some(ApiError::InvalidObjectState(_))
        ));
        assert_eq!(error.to_string(), "Already sent");
    }

    #[test]
    fn test_compensation_failed_keeps_original_as_source() {
        let original: ResourceError =
            ApiError::InvalidFieldValue(ErrorDetails::new("bad email")).into();
        let cleanup: ResourceError =
            ApiError::ServiceMalfunctioning(ErrorDetails::new("down")).into();
        let error = ResourceError::CompensationFailed {
            object_id: "abc".to_string(),
            source: Box::new(original),
            cleanup: Box::new(cleanup),
        };

        assert!(matches!(error.api_error(), Some(ApiError::InvalidFieldValue(_))));
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "bad email");
        assert!(error.to_string().contains("abc"));
    }
}
