//! Error types for Billogram API communication.
//!
//! # Error Handling
//!
//! - [`ApiError`]: A failure classified from an API response, one variant per
//!   error kind, each carrying the server-supplied [`ErrorDetails`]
//! - [`InvalidHttpRequestError`]: A request that failed validation before sending
//! - [`HttpError`]: Unified error type for everything the transport can fail with
//!
//! The API error kinds form a small hierarchy. Callers can match a specific
//! variant, or test for a whole family with [`ApiError::is_permission_denied`],
//! [`ApiError::is_request_data_error`] and [`ApiError::is_not_found`].
//!
//! # Example
//!
//! ```rust,ignore
//! use billogram_api::clients::{ApiError, HttpError};
//!
//! match client.get("billogram/abc123", None, None).await {
//!     Ok(payload) => println!("{payload:?}"),
//!     Err(HttpError::Api(ApiError::ObjectNotAvailableYet(_))) => {
//!         println!("try again later");
//!     }
//!     Err(HttpError::Api(e)) if e.is_not_found() => println!("no such billogram"),
//!     Err(HttpError::Api(e)) => println!("API error {}: {}", e.kind(), e),
//!     Err(e) => println!("transport failure: {e}"),
//! }
//! ```

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Details attached to every classified API error.
///
/// `field` and `field_path` locate the offending value in the request
/// payload when the server reports one. Everything else the server put in
/// the error's `data` object ends up in `extra_data`, unmodified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorDetails {
    /// Human-readable error message.
    pub message: String,
    /// Name of the offending field, if reported.
    pub field: Option<String>,
    /// Path of keys and indices to the offending value, if reported.
    pub field_path: Option<Vec<Value>>,
    /// Any other fields the server supplied.
    pub extra_data: Option<Map<String, Value>>,
}

impl ErrorDetails {
    /// Creates details carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Builds details from the `data` object of an error envelope.
    ///
    /// `message`, `field` and `field_path` are lifted out; the remaining
    /// keys become `extra_data`. When the server sent no message,
    /// `fallback_message` is used.
    #[must_use]
    pub fn from_error_data(data: &Value, fallback_message: &str) -> Self {
        let Some(object) = data.as_object() else {
            return Self::new(fallback_message);
        };

        let mut extra = object.clone();
        let message = match extra.remove("message") {
            Some(Value::String(message)) => message,
            Some(Value::Null) | None => fallback_message.to_string(),
            Some(other) => other.to_string(),
        };
        let field = match extra.remove("field") {
            Some(Value::String(field)) => Some(field),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        let field_path = match extra.remove("field_path") {
            Some(Value::Array(path)) => Some(path),
            Some(Value::Null) | None => None,
            Some(other) => Some(vec![other]),
        };

        Self {
            message,
            field,
            field_path,
            extra_data: (!extra.is_empty()).then_some(extra),
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

/// The kind of a classified API error, without its details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The service is malfunctioning (5xx, malformed envelope, unexpected content type).
    ServiceMalfunctioning,
    /// The request itself was malformed.
    RequestForm,
    /// Permission denied for an unspecified reason.
    PermissionDenied,
    /// The user/key combination could not be authenticated.
    InvalidAuthentication,
    /// The user is not authorized to perform the operation.
    NotAuthorized,
    /// Bad data in the request, not further specified.
    RequestData,
    /// An unknown field was passed.
    UnknownField,
    /// A required field was missing.
    MissingField,
    /// Mutually exclusive fields were specified together.
    InvalidFieldCombination,
    /// A field had an out-of-range value or a value of the wrong type.
    InvalidFieldValue,
    /// Attempt to modify a read-only field.
    ReadOnlyField,
    /// The operation is not possible in the object's current state.
    InvalidObjectState,
    /// No object with the requested id exists.
    ObjectNotFound,
    /// No object with the requested id exists yet, but it is expected soon.
    ObjectNotAvailableYet,
}

impl ApiErrorKind {
    /// Maps a non-`OK` envelope status to an error kind.
    ///
    /// Unrecognized statuses map to [`ApiErrorKind::RequestData`].
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status {
            "MISSING_QUERY_PARAMETER" | "INVALID_QUERY_PARAMETER" => Self::RequestForm,
            "INVALID_PARAMETER" => Self::InvalidFieldValue,
            "INVALID_PARAMETER_COMBINATION" => Self::InvalidFieldCombination,
            "READ_ONLY_PARAMETER" => Self::ReadOnlyField,
            "UNKNOWN_PARAMETER" => Self::UnknownField,
            "MISSING_PARAMETER" => Self::MissingField,
            "INVALID_OBJECT_STATE" => Self::InvalidObjectState,
            _ => Self::RequestData,
        }
    }

    /// Returns the kind's name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceMalfunctioning => "service_malfunctioning",
            Self::RequestForm => "request_form",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidAuthentication => "invalid_authentication",
            Self::NotAuthorized => "not_authorized",
            Self::RequestData => "request_data",
            Self::UnknownField => "unknown_field",
            Self::MissingField => "missing_field",
            Self::InvalidFieldCombination => "invalid_field_combination",
            Self::InvalidFieldValue => "invalid_field_value",
            Self::ReadOnlyField => "read_only_field",
            Self::InvalidObjectState => "invalid_object_state",
            Self::ObjectNotFound => "object_not_found",
            Self::ObjectNotAvailableYet => "object_not_available_yet",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by (or about) the Billogram API.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// The API service seems to be malfunctioning.
    #[error("{0}")]
    ServiceMalfunctioning(ErrorDetails),

    /// The request was malformed (bad method, missing auth, bad query parameters).
    #[error("{0}")]
    RequestForm(ErrorDetails),

    /// No permission to perform the requested operation.
    #[error("{0}")]
    PermissionDenied(ErrorDetails),

    /// The user/key combination could not be authenticated.
    #[error("{0}")]
    InvalidAuthentication(ErrorDetails),

    /// The user does not have authorization to perform the operation.
    #[error("{0}")]
    NotAuthorized(ErrorDetails),

    /// Bad data was passed in the request.
    #[error("{0}")]
    RequestData(ErrorDetails),

    /// An unknown field was passed in the request data.
    #[error("{0}")]
    UnknownField(ErrorDetails),

    /// A required field was missing from the request data.
    #[error("{0}")]
    MissingField(ErrorDetails),

    /// Mutually exclusive fields were specified together.
    #[error("{0}")]
    InvalidFieldCombination(ErrorDetails),

    /// A field was given an out-of-range value or a value of incorrect type.
    #[error("{0}")]
    InvalidFieldValue(ErrorDetails),

    /// Attempt to modify a read-only field.
    #[error("{0}")]
    ReadOnlyField(ErrorDetails),

    /// The request can not be performed on an object in this state.
    #[error("{0}")]
    InvalidObjectState(ErrorDetails),

    /// No object by the requested id exists.
    #[error("{0}")]
    ObjectNotFound(ErrorDetails),

    /// No object by the requested id exists, but it is expected to be created soon.
    #[error("{0}")]
    ObjectNotAvailableYet(ErrorDetails),
}

impl ApiError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ApiErrorKind, details: ErrorDetails) -> Self {
        match kind {
            ApiErrorKind::ServiceMalfunctioning => Self::ServiceMalfunctioning(details),
            ApiErrorKind::RequestForm => Self::RequestForm(details),
            ApiErrorKind::PermissionDenied => Self::PermissionDenied(details),
            ApiErrorKind::InvalidAuthentication => Self::InvalidAuthentication(details),
            ApiErrorKind::NotAuthorized => Self::NotAuthorized(details),
            ApiErrorKind::RequestData => Self::RequestData(details),
            ApiErrorKind::UnknownField => Self::UnknownField(details),
            ApiErrorKind::MissingField => Self::MissingField(details),
            ApiErrorKind::InvalidFieldCombination => Self::InvalidFieldCombination(details),
            ApiErrorKind::InvalidFieldValue => Self::InvalidFieldValue(details),
            ApiErrorKind::ReadOnlyField => Self::ReadOnlyField(details),
            ApiErrorKind::InvalidObjectState => Self::InvalidObjectState(details),
            ApiErrorKind::ObjectNotFound => Self::ObjectNotFound(details),
            ApiErrorKind::ObjectNotAvailableYet => Self::ObjectNotAvailableYet(details),
        }
    }

    /// Creates a service-malfunction error with the given message.
    #[must_use]
    pub fn service_malfunctioning(message: impl Into<String>) -> Self {
        Self::ServiceMalfunctioning(ErrorDetails::new(message))
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::ServiceMalfunctioning(_) => ApiErrorKind::ServiceMalfunctioning,
            Self::RequestForm(_) => ApiErrorKind::RequestForm,
            Self::PermissionDenied(_) => ApiErrorKind::PermissionDenied,
            Self::InvalidAuthentication(_) => ApiErrorKind::InvalidAuthentication,
            Self::NotAuthorized(_) => ApiErrorKind::NotAuthorized,
            Self::RequestData(_) => ApiErrorKind::RequestData,
            Self::UnknownField(_) => ApiErrorKind::UnknownField,
            Self::MissingField(_) => ApiErrorKind::MissingField,
            Self::InvalidFieldCombination(_) => ApiErrorKind::InvalidFieldCombination,
            Self::InvalidFieldValue(_) => ApiErrorKind::InvalidFieldValue,
            Self::ReadOnlyField(_) => ApiErrorKind::ReadOnlyField,
            Self::InvalidObjectState(_) => ApiErrorKind::InvalidObjectState,
            Self::ObjectNotFound(_) => ApiErrorKind::ObjectNotFound,
            Self::ObjectNotAvailableYet(_) => ApiErrorKind::ObjectNotAvailableYet,
        }
    }

    /// Returns the details carried by this error.
    #[must_use]
    pub const fn details(&self) -> &ErrorDetails {
        match self {
            Self::ServiceMalfunctioning(d)
            | Self::RequestForm(d)
            | Self::PermissionDenied(d)
            | Self::InvalidAuthentication(d)
            | Self::NotAuthorized(d)
            | Self::RequestData(d)
            | Self::UnknownField(d)
            | Self::MissingField(d)
            | Self::InvalidFieldCombination(d)
            | Self::InvalidFieldValue(d)
            | Self::ReadOnlyField(d)
            | Self::InvalidObjectState(d)
            | Self::ObjectNotFound(d)
            | Self::ObjectNotAvailableYet(d) => d,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.details().message
    }

    /// Returns the offending field, if the server reported one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.details().field.as_deref()
    }

    /// Returns the path to the offending value, if the server reported one.
    #[must_use]
    pub fn field_path(&self) -> Option<&[Value]> {
        self.details().field_path.as_deref()
    }

    /// Returns `true` for the permission-denied family.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::InvalidAuthentication(_) | Self::NotAuthorized(_)
        )
    }

    /// Returns `true` for the request-data family, which includes the
    /// not-found kinds.
    #[must_use]
    pub const fn is_request_data_error(&self) -> bool {
        matches!(
            self,
            Self::RequestData(_)
                | Self::UnknownField(_)
                | Self::MissingField(_)
                | Self::InvalidFieldCombination(_)
                | Self::InvalidFieldValue(_)
                | Self::ReadOnlyField(_)
                | Self::InvalidObjectState(_)
                | Self::ObjectNotFound(_)
                | Self::ObjectNotAvailableYet(_)
        )
    }

    /// Returns `true` for object-not-found, including not-available-yet.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound(_) | Self::ObjectNotAvailableYet(_))
    }
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path was empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,
}

/// Unified error type for all transport-level failures.
///
/// [`HttpError::Api`] holds classified API errors; [`HttpError::Network`]
/// holds failures below HTTP (connection refused, DNS, timeouts).
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API reported (or the response revealed) an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the classified API error, if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}
