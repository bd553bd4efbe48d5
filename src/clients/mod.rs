//! HTTP client types for Billogram API communication.
//!
//! This module provides the transport layer: authenticated requests against
//! the API and classification of every response into either a payload or a
//! typed error.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A raw response as received from the API
//! - [`ResponseEnvelope`]: The decoded `{status, data, meta}` wrapper
//! - [`check_api_response`]: The response classifier
//! - [`ApiError`]: The classified error taxonomy
//!
//! # Retry Behavior
//!
//! None. Every failure, transport-level or classified, is returned to the
//! caller immediately; retry policy belongs to the caller.

mod classifier;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use classifier::{check_api_response, NOT_AVAILABLE_YET};
pub use errors::{ApiError, ApiErrorKind, ErrorDetails, HttpError, InvalidHttpRequestError};
pub use http_client::HttpClient;
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, JSON_CONTENT_TYPE};
pub use http_response::{ApiPayload, HttpResponse, ResponseEnvelope, ResponseMeta};
