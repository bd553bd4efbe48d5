//! Response classification for the Billogram API.
//!
//! [`check_api_response`] turns a raw [`HttpResponse`] into either an
//! [`ApiPayload`] or a typed [`ApiError`]. The checks run in a fixed order:
//!
//! 1. 5xx status: service malfunction
//! 2. content type differs from the expected one: not-available-yet when the
//!    body is a JSON `NOT_AVAILABLE_YET` envelope, service malfunction otherwise
//! 3. non-JSON content was expected: the raw body is returned unchecked
//! 4. envelope without `status`: service malfunction; a `NOT_AVAILABLE_YET`
//!    status means not-available-yet (except on 403 and 405); an envelope
//!    without `data` is a service malfunction
//! 5. 403, 404 and 405 map to the permission, not-found and request-form kinds
//! 6. status `OK`: the envelope is returned
//! 7. any other status is looked up in [`ApiErrorKind::from_status`]
//!
//! A failed (non-2xx) response is always expected to be JSON, whatever the
//! caller asked for.

use serde_json::Value;

use crate::clients::errors::{ApiError, ApiErrorKind, ErrorDetails};
use crate::clients::http_request::JSON_CONTENT_TYPE;
use crate::clients::http_response::{
    normalize_media_type, ApiPayload, HttpResponse, ResponseEnvelope,
};

/// Envelope status of objects that exist but are still being created.
pub const NOT_AVAILABLE_YET: &str = "NOT_AVAILABLE_YET";

/// Classifies a raw response.
///
/// # Arguments
///
/// * `response` - The raw response
/// * `expect_content_type` - The content type a successful response should
///   have; `None` means `application/json`
///
/// # Errors
///
/// Returns the [`ApiError`] variant matching the response.
///
/// # Example
///
/// ```rust
/// use billogram_api::clients::{check_api_response, ApiError, HttpResponse};
///
/// let response = HttpResponse::new(
///     403,
///     Some("application/json".to_string()),
///     br#"{"status": "INVALID_AUTH", "data": {}}"#.to_vec(),
/// );
/// let result = check_api_response(&response, None);
/// assert!(matches!(result, Err(ApiError::InvalidAuthentication(_))));
/// ```
pub fn check_api_response(
    response: &HttpResponse,
    expect_content_type: Option<&str>,
) -> Result<ApiPayload, ApiError> {
    let expected = match expect_content_type {
        Some(content_type) if response.is_ok() => normalize_media_type(content_type),
        _ => JSON_CONTENT_TYPE.to_string(),
    };
    let actual = response.media_type();
    let actual_is_json = actual.as_deref() == Some(JSON_CONTENT_TYPE);

    if (500..=599).contains(&response.code) {
        return Err(server_error(response, actual_is_json && expected == JSON_CONTENT_TYPE));
    }

    if actual.as_deref() != Some(expected.as_str()) {
        if actual_is_json && envelope_status(response.json().as_ref()) == Some(NOT_AVAILABLE_YET) {
            return Err(ApiError::ObjectNotAvailableYet(ErrorDetails::new(
                "Object not available yet",
            )));
        }
        return Err(ApiError::service_malfunctioning(
            "Billogram API returned unexpected content type",
        ));
    }

    if expected != JSON_CONTENT_TYPE {
        return Ok(ApiPayload::Raw(response.body.clone()));
    }

    let body = response
        .json()
        .ok_or_else(|| ApiError::service_malfunctioning("Response data is not valid JSON"))?;
    let status = envelope_status(Some(&body))
        .filter(|status| !status.is_empty())
        .ok_or_else(|| ApiError::service_malfunctioning("Response data missing status field"))?
        .to_string();
    if status == NOT_AVAILABLE_YET && !matches!(response.code, 403 | 405) {
        let details = body.get("data").map_or_else(
            || ErrorDetails::new("Object not available yet"),
            |data| ErrorDetails::from_error_data(data, "Object not available yet"),
        );
        return Err(ApiError::ObjectNotAvailableYet(details));
    }
    let data = body
        .get("data")
        .ok_or_else(|| ApiError::service_malfunctioning("Response data missing data field"))?;

    match response.code {
        403 => {
            let (kind, message) = match status.as_str() {
                "PERMISSION_DENIED" => (
                    ApiErrorKind::NotAuthorized,
                    "Not allowed to perform the requested operation".to_string(),
                ),
                "INVALID_AUTH" => (
                    ApiErrorKind::InvalidAuthentication,
                    "The user/key combination is wrong, check the credentials used and possibly generate a new set".to_string(),
                ),
                "MISSING_AUTH" => (
                    ApiErrorKind::RequestForm,
                    "No authentication data was given".to_string(),
                ),
                other => (
                    ApiErrorKind::PermissionDenied,
                    format!("Permission denied, status={other}"),
                ),
            };
            return Err(ApiError::new(kind, ErrorDetails::from_error_data(data, &message)));
        }
        404 => {
            return Err(ApiError::ObjectNotFound(ErrorDetails::from_error_data(
                data,
                "Object not found",
            )));
        }
        405 => {
            return Err(ApiError::RequestForm(ErrorDetails::from_error_data(
                data,
                "Invalid HTTP method",
            )));
        }
        _ => {}
    }

    if status == "OK" {
        let envelope: ResponseEnvelope = serde_json::from_value(body).map_err(|e| {
            ApiError::service_malfunctioning(format!("Malformed response envelope: {e}"))
        })?;
        return Ok(ApiPayload::Envelope(envelope));
    }

    Err(ApiError::new(
        ApiErrorKind::from_status(&status),
        ErrorDetails::from_error_data(data, &status),
    ))
}

fn envelope_status(body: Option<&Value>) -> Option<&str> {
    body.and_then(|body| body.get("status")).and_then(Value::as_str)
}

fn server_error(response: &HttpResponse, json_expected: bool) -> ApiError {
    if json_expected {
        if let Some(body) = response.json() {
            let status = envelope_status(Some(&body)).unwrap_or_default();
            let message = body
                .get("data")
                .and_then(|data| data.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            return ApiError::service_malfunctioning(format!(
                "Billogram API reported a server error: {status} - {message}"
            ));
        }
    }
    ApiError::service_malfunctioning("Billogram API reported a server error")
}
