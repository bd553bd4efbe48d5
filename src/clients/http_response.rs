//! HTTP response types for the Billogram API client.
//!
//! [`HttpResponse`] is the raw exchange result as received from the server.
//! [`ResponseEnvelope`] is the decoded standard wrapper every JSON response
//! uses, and [`ApiPayload`] is what a successfully classified response turns
//! into.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::clients::errors::ApiError;

/// A raw HTTP response from the Billogram API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// The unparsed response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, content_type: Option<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            content_type,
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the media type of the response, lowercased and without
    /// parameters such as `charset`.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(normalize_media_type)
    }

    /// Parses the body as JSON, returning `None` if it is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Strips parameters from a content type and lowercases it.
pub(crate) fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Metadata attached to list responses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ResponseMeta {
    /// Total number of objects matched by the query, across all pages.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Any other metadata fields.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The standard JSON wrapper of every Billogram API response.
///
/// # Example
///
/// ```rust
/// use billogram_api::clients::ResponseEnvelope;
///
/// let envelope: ResponseEnvelope = serde_json::from_str(
///     r#"{"status": "OK", "data": [], "meta": {"total_count": 37}}"#,
/// ).unwrap();
/// assert!(envelope.is_ok());
/// assert_eq!(envelope.total_count(), Some(37));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    /// The status string; `"OK"` on success.
    pub status: String,
    /// The response data, an object or an array.
    pub data: Value,
    /// Optional metadata.
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

impl ResponseEnvelope {
    /// Returns `true` if the status is `"OK"`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }

    /// Returns the `meta.total_count` value, if present.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.meta.as_ref().and_then(|meta| meta.total_count)
    }
}

/// A successfully classified response.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiPayload {
    /// A decoded JSON envelope with status `OK`.
    Envelope(ResponseEnvelope),
    /// Raw body content of a response that was expected not to be JSON.
    Raw(Vec<u8>),
}

impl ApiPayload {
    /// Returns the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ServiceMalfunctioning`] if the payload is raw content.
    pub fn into_envelope(self) -> Result<ResponseEnvelope, ApiError> {
        match self {
            Self::Envelope(envelope) => Ok(envelope),
            Self::Raw(_) => Err(ApiError::service_malfunctioning(
                "Expected a JSON envelope but received raw content",
            )),
        }
    }
}
