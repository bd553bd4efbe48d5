//! Billogram (invoice) objects and their state-transition events.
//!
//! A billogram moves through states such as `Unattested`, `Unpaid`, `Sold`
//! and `Ended` by posting events to `billogram/<id>/command/<event>`. The
//! server decides which events are legal; an event posted in the wrong state
//! fails with [`ApiError::InvalidObjectState`](crate::clients::ApiError::InvalidObjectState).
//!
//! Every event replaces the billogram's snapshot with the object returned by
//! the server. Arguments are checked locally before anything is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use billogram_api::rest::resources::SendMethod;
//!
//! let mut billogram = api
//!     .billogram()
//!     .create_and_send(&json!({"customer": {"customer_no": 1001}, "items": items}), SendMethod::Email)
//!     .await?;
//!
//! billogram.create_payment(250.0).await?;
//! let pdf = billogram.get_invoice_pdf(None, None).await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::str::FromStr;

use base64::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};

use crate::clients::JSON_CONTENT_TYPE;
use crate::rest::{
    attachment_path, command_path, pdf_path, Collection, FromRemoteObject, Query, RemoteObject,
    ResourceError,
};

/// How a billogram is delivered to its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendMethod {
    /// By email.
    Email,
    /// By letter.
    Letter,
    /// Both by email and by letter.
    EmailLetter,
}

impl SendMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Letter => "Letter",
            Self::EmailLetter => "Email+Letter",
        }
    }
}

impl fmt::Display for SendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendMethod {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Email" => Ok(Self::Email),
            "Letter" => Ok(Self::Letter),
            "Email+Letter" => Ok(Self::EmailLetter),
            other => Err(ResourceError::invalid_argument(
                "method",
                format!("must be Email, Letter or Email+Letter, got '{other}'"),
            )),
        }
    }
}

/// How a reminder or a resend is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderMethod {
    /// By email.
    Email,
    /// By letter.
    Letter,
}

impl ReminderMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Letter => "Letter",
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderMethod {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Email" => Ok(Self::Email),
            "Letter" => Ok(Self::Letter),
            other => Err(ResourceError::invalid_argument(
                "method",
                format!("must be Email or Letter, got '{other}'"),
            )),
        }
    }
}

/// A billogram object.
///
/// Dereferences to [`RemoteObject`] for field access, refresh and update.
#[derive(Debug, Clone)]
pub struct Billogram {
    object: RemoteObject,
}

impl FromRemoteObject for Billogram {
    fn from_remote_object(object: RemoteObject) -> Self {
        Self { object }
    }
}

impl Deref for Billogram {
    type Target = RemoteObject;

    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

impl DerefMut for Billogram {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.object
    }
}

impl Billogram {
    /// Returns the underlying remote object.
    #[must_use]
    pub fn into_inner(self) -> RemoteObject {
        self.object
    }

    /// Deletes the billogram. Only possible while it is unattested.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn delete(self) -> Result<(), ResourceError> {
        self.object.delete().await
    }

    /// Posts a state-transition event and replaces the snapshot with the
    /// result.
    ///
    /// Events without data post a JSON `null` body.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error; the snapshot is left
    /// unchanged on failure.
    pub async fn perform_event(
        &mut self,
        event: &str,
        data: Option<Value>,
    ) -> Result<(), ResourceError> {
        if event.is_empty() {
            return Err(ResourceError::invalid_argument("event", "must not be empty"));
        }
        let path = command_path(&self.object.path()?, event);
        tracing::debug!(path = %path, event, "Performing event");
        let envelope = self
            .object
            .client()
            .post(&path, data.unwrap_or(Value::Null))
            .await?;
        self.object.replace_snapshot(envelope.data)
    }

    /// Registers a manual payment. Only possible while unpaid.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] unless `amount` is a
    /// positive number.
    pub async fn create_payment(&mut self, amount: f64) -> Result<(), ResourceError> {
        check_amount(amount)?;
        self.perform_event("payment", Some(json!({"amount": amount})))
            .await
    }

    /// Credits part of the billogram. Only possible while unpaid, sold or
    /// ended.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] unless `amount` is a
    /// positive number.
    pub async fn credit_amount(&mut self, amount: f64) -> Result<(), ResourceError> {
        check_amount(amount)?;
        self.perform_event("credit", Some(json!({"mode": "amount", "amount": amount})))
            .await
    }

    /// Credits the full original amount.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn credit_full(&mut self) -> Result<(), ResourceError> {
        self.perform_event("credit", Some(json!({"mode": "full"})))
            .await
    }

    /// Credits the remaining unpaid amount.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn credit_remaining(&mut self) -> Result<(), ResourceError> {
        self.perform_event("credit", Some(json!({"mode": "remaining"})))
            .await
    }

    /// Sends a message to the recipient. Possible in every state except
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for an empty message.
    pub async fn send_message(&mut self, message: &str) -> Result<(), ResourceError> {
        if message.is_empty() {
            return Err(ResourceError::invalid_argument("message", "must not be empty"));
        }
        self.perform_event("message", Some(json!({"message": message})))
            .await
    }

    /// Hands the billogram to the collection agency. Only possible while
    /// unpaid.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn send_to_collector(&mut self) -> Result<(), ResourceError> {
        self.perform_event("collect", None).await
    }

    /// Sells the billogram to the factoring agency. Only possible while
    /// unattested.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn send_to_factoring(&mut self) -> Result<(), ResourceError> {
        self.perform_event("sell", None).await
    }

    /// Sends a reminder, by the account's default method unless one is
    /// given. Only possible while unpaid.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn send_reminder(
        &mut self,
        method: Option<ReminderMethod>,
    ) -> Result<(), ResourceError> {
        let data = method.map(|m| json!({"method": m.as_str()}));
        self.perform_event("remind", data).await
    }

    /// Sends the billogram to its recipient. Only possible while
    /// unattested.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn send(&mut self, method: SendMethod) -> Result<(), ResourceError> {
        self.perform_event("send", Some(json!({"method": method.as_str()})))
            .await
    }

    /// Sends the billogram again. Only possible while unpaid.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn resend(&mut self, method: Option<ReminderMethod>) -> Result<(), ResourceError> {
        let data = method.map(|m| json!({"method": m.as_str()}));
        self.perform_event("resend", data).await
    }

    /// Attaches a PDF file, read from `path`, to the billogram.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if the file cannot be read; nothing is
    /// sent in that case.
    pub async fn attach_pdf(&mut self, path: impl AsRef<Path>) -> Result<(), ResourceError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ResourceError::invalid_argument("path", "has no file name"))?;
        let content = tokio::fs::read(path).await?;
        self.attach_pdf_bytes(&filename, &content).await
    }

    /// Attaches PDF content to the billogram under `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for an empty filename.
    pub async fn attach_pdf_bytes(
        &mut self,
        filename: &str,
        content: &[u8],
    ) -> Result<(), ResourceError> {
        if filename.is_empty() {
            return Err(ResourceError::invalid_argument("filename", "must not be empty"));
        }
        let data = json!({
            "content": BASE64_STANDARD.encode(content),
            "filename": filename,
        });
        self.perform_event("attach", Some(data)).await
    }

    /// Fetches the PDF of one of the billogram's invoices.
    ///
    /// Without arguments the latest invoice is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ObjectNotAvailableYet`](crate::clients::ApiError::ObjectNotAvailableYet)
    /// while the PDF is still being generated, and
    /// [`ResourceError::Decode`] if its content is not valid base64.
    pub async fn get_invoice_pdf(
        &self,
        letter_id: Option<&str>,
        invoice_no: Option<&str>,
    ) -> Result<Vec<u8>, ResourceError> {
        let query: HashMap<String, String> = [
            ("letter_id", letter_id),
            ("invoice_no", invoice_no),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect();
        let query = (!query.is_empty()).then_some(query);
        self.fetch_document(&pdf_path(&self.object.path()?), query)
            .await
    }

    /// Fetches the PDF attached to the billogram.
    ///
    /// # Errors
    ///
    /// See [`get_invoice_pdf`](Self::get_invoice_pdf).
    pub async fn get_attachment_pdf(&self) -> Result<Vec<u8>, ResourceError> {
        self.fetch_document(&attachment_path(&self.object.path()?), None)
            .await
    }

    async fn fetch_document(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<Vec<u8>, ResourceError> {
        tracing::debug!(path = %path, "Fetching document");
        let envelope = self
            .object
            .client()
            .get_content(path, query, JSON_CONTENT_TYPE)
            .await?
            .into_envelope()?;
        let content = envelope
            .data
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ResourceError::InvalidResponse(format!("document at {path} carried no content"))
            })?;
        Ok(BASE64_STANDARD.decode(content)?)
    }
}

fn check_amount(amount: f64) -> Result<(), ResourceError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ResourceError::invalid_argument(
            "amount",
            format!("must be a positive number, got {amount}"),
        ))
    }
}

impl Collection<Billogram> {
    /// Creates a billogram and sends it in one operation.
    ///
    /// The new billogram ends up unpaid, or ended if its total is zero. The
    /// returned snapshot is the one received from the send event.
    ///
    /// This is not a transaction. If sending fails, the created billogram is
    /// deleted and the send error is returned. If that delete fails as well,
    /// [`ResourceError::CompensationFailed`] is returned; it carries the send
    /// error as its source, the delete error, and the id of the billogram
    /// that may remain on the server.
    ///
    /// # Errors
    ///
    /// Returns the creation error, the send error, or a compensation
    /// failure as described above.
    pub async fn create_and_send<D: Serialize + ?Sized>(
        &self,
        data: &D,
        method: SendMethod,
    ) -> Result<Billogram, ResourceError> {
        let mut billogram = self.create(data).await?;
        let Err(error) = billogram.send(method).await else {
            return Ok(billogram);
        };

        let object_id = billogram.id().unwrap_or_default();
        tracing::warn!(
            object_id = %object_id,
            error = %error,
            "Sending new billogram failed, deleting it"
        );
        if let Err(cleanup) = billogram.delete().await {
            tracing::error!(
                object_id = %object_id,
                error = %cleanup,
                "Failed to delete billogram after failed send"
            );
            return Err(ResourceError::CompensationFailed {
                object_id,
                source: Box::new(error),
                cleanup: Box::new(cleanup),
            });
        }
        Err(error)
    }

    /// Creates a billogram and sells it to the factoring agency in one
    /// operation. The new billogram ends up in the factoring state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if `data` does not
    /// serialize to a JSON object, or the creation error.
    pub async fn create_and_sell<D: Serialize + ?Sized>(
        &self,
        data: &D,
    ) -> Result<Billogram, ResourceError> {
        let Value::Object(mut data) = serde_json::to_value(data)? else {
            return Err(ResourceError::invalid_argument(
                "data",
                "must serialize to a JSON object",
            ));
        };
        data.insert("_event".to_string(), Value::from("sell"));
        self.create(&data).await
    }
}

impl Query<Billogram> {
    /// Filters on billograms in any of the given states.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if no state is given.
    pub fn filter_state_any<I, S>(&mut self, states: I) -> Result<&mut Self, ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let states: Vec<S> = states.into_iter().collect();
        if states.is_empty() {
            return Err(ResourceError::invalid_argument(
                "states",
                "at least one state is required",
            ));
        }
        let joined = states
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(",");
        Ok(self.filter_field("state", &joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ApiError, HttpClient};
    use crate::config::{ApiBaseUrl, AuthKey, AuthUser, BillogramConfig};
    use crate::rest::ObjectType;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<HttpClient> {
        let config = BillogramConfig::builder()
            .auth_user(AuthUser::new("test-user").unwrap())
            .auth_key(AuthKey::new("test-key").unwrap())
            .api_base(ApiBaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap();
        Arc::new(HttpClient::new(&config).unwrap())
    }

    fn billogram_for(server: &MockServer, state: &str) -> Billogram {
        let object = RemoteObject::from_snapshot(
            client_for(server),
            ObjectType::BILLOGRAM,
            json!({"id": "abc", "state": state}),
        )
        .unwrap();
        Billogram::from_remote_object(object)
    }

    fn ok(data: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "data": data}))
    }

    #[test]
    fn test_send_method_wire_names() {
        assert_eq!(SendMethod::EmailLetter.as_str(), "Email+Letter");
        assert_eq!("Letter".parse::<SendMethod>().unwrap(), SendMethod::Letter);
        assert!("Fax".parse::<SendMethod>().is_err());
        assert!("Email+Letter".parse::<ReminderMethod>().is_err());
        assert_eq!("Email".parse::<ReminderMethod>().unwrap(), ReminderMethod::Email);
    }

    #[test]
    fn test_check_amount() {
        assert!(check_amount(0.01).is_ok());
        assert!(check_amount(0.0).is_err());
        assert!(check_amount(-10.0).is_err());
        assert!(check_amount(f64::NAN).is_err());
        assert!(check_amount(f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn test_payment_posts_event_and_replaces_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram/abc/command/payment"))
            .and(body_json(json!({"amount": 100.5})))
            .respond_with(ok(json!({"id": "abc", "state": "Paid"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.create_payment(100.5).await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Paid");
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected_without_request() {
        let server = MockServer::start().await;
        let mut billogram = billogram_for(&server, "Unpaid");

        let error = billogram.credit_amount(-5.0).await.unwrap_err();
        assert!(matches!(
            error,
            ResourceError::InvalidArgument { argument: "amount", .. }
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_event_without_data_posts_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram/abc/command/collect"))
            .and(body_json(Value::Null))
            .respond_with(ok(json!({"id": "abc", "state": "Collection"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.send_to_collector().await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Collection");
    }

    #[tokio::test]
    async fn test_reminder_method_is_optional() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram/abc/command/remind"))
            .and(body_json(json!({"method": "Letter"})))
            .respond_with(ok(json!({"id": "abc", "state": "Unpaid"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram
            .send_reminder(Some(ReminderMethod::Letter))
            .await
            .unwrap();
    }

    async fn mount_event(server: &MockServer, event: &str, body: Value, state: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/billogram/abc/command/{event}")))
            .and(body_json(body))
            .respond_with(ok(json!({"id": "abc", "state": state})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_credit_amount_posts_amount_mode() {
        let server = MockServer::start().await;
        mount_event(&server, "credit", json!({"mode": "amount", "amount": 5.0}), "Unpaid").await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.credit_amount(5.0).await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Unpaid");
    }

    #[tokio::test]
    async fn test_credit_remaining_posts_remaining_mode() {
        let server = MockServer::start().await;
        mount_event(&server, "credit", json!({"mode": "remaining"}), "Ended").await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.credit_remaining().await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Ended");
    }

    #[tokio::test]
    async fn test_send_message_posts_message() {
        let server = MockServer::start().await;
        mount_event(&server, "message", json!({"message": "hi"}), "Unpaid").await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.send_message("hi").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_without_request() {
        let server = MockServer::start().await;
        let mut billogram = billogram_for(&server, "Unpaid");

        let error = billogram.send_message("").await.unwrap_err();
        assert!(matches!(
            error,
            ResourceError::InvalidArgument { argument: "message", .. }
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_message_is_left_to_the_server() {
        let server = MockServer::start().await;
        mount_event(&server, "message", json!({"message": "  "}), "Unpaid").await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.send_message("  ").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_to_factoring_posts_sell_with_null() {
        let server = MockServer::start().await;
        mount_event(&server, "sell", Value::Null, "Factoring").await;

        let mut billogram = billogram_for(&server, "Unattested");
        billogram.send_to_factoring().await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Factoring");
    }

    #[tokio::test]
    async fn test_resend_posts_method() {
        let server = MockServer::start().await;
        mount_event(&server, "resend", json!({"method": "Email"}), "Unpaid").await;

        let mut billogram = billogram_for(&server, "Unpaid");
        billogram.resend(Some(ReminderMethod::Email)).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_posts_wire_method_name() {
        let server = MockServer::start().await;
        mount_event(&server, "send", json!({"method": "Email+Letter"}), "Unpaid").await;

        let mut billogram = billogram_for(&server, "Unattested");
        billogram.send(SendMethod::EmailLetter).await.unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Unpaid");
    }

    #[tokio::test]
    async fn test_wrong_state_is_invalid_object_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram/abc/command/credit"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "INVALID_OBJECT_STATE",
                "data": {"message": "Cannot credit an unattested billogram"}
            })))
            .mount(&server)
            .await;

        let mut billogram = billogram_for(&server, "Unattested");
        let error = billogram.credit_full().await.unwrap_err();
        assert!(matches!(error.api_error(), Some(ApiError::InvalidObjectState(_))));
        assert_eq!(billogram.get("state").unwrap(), "Unattested");
    }

    #[tokio::test]
    async fn test_attach_pdf_bytes_encodes_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram/abc/command/attach"))
            .and(body_json(json!({"content": "JVBERi0=", "filename": "terms.pdf"})))
            .respond_with(ok(json!({"id": "abc", "state": "Unattested"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut billogram = billogram_for(&server, "Unattested");
        billogram
            .attach_pdf_bytes("terms.pdf", b"%PDF-")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_attach_missing_file_is_local_error() {
        let server = MockServer::start().await;
        let mut billogram = billogram_for(&server, "Unattested");

        let error = billogram
            .attach_pdf("/nonexistent/dir/terms.pdf")
            .await
            .unwrap_err();
        assert!(matches!(error, ResourceError::Io(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_pdf_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/billogram/abc.pdf"))
            .and(query_param("invoice_no", "3"))
            .respond_with(ok(json!({"content": "JVBERi0=", "file_type": "pdf"})))
            .expect(1)
            .mount(&server)
            .await;

        let billogram = billogram_for(&server, "Unpaid");
        let pdf = billogram.get_invoice_pdf(None, Some("3")).await.unwrap();
        assert_eq!(pdf, b"%PDF-");
    }

    #[tokio::test]
    async fn test_attachment_pdf_not_available_yet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/billogram/abc/attachment.pdf"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "NOT_AVAILABLE_YET",
                "data": {"message": "The PDF is being generated"}
            })))
            .mount(&server)
            .await;

        let billogram = billogram_for(&server, "Unpaid");
        let error = billogram.get_attachment_pdf().await.unwrap_err();
        assert!(matches!(
            error.api_error(),
            Some(ApiError::ObjectNotAvailableYet(_))
        ));
    }

    #[tokio::test]
    async fn test_document_without_content_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/billogram/abc.pdf"))
            .respond_with(ok(json!({})))
            .mount(&server)
            .await;

        let billogram = billogram_for(&server, "Unpaid");
        assert!(matches!(
            billogram.get_invoice_pdf(None, None).await,
            Err(ResourceError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_create_and_sell_adds_event_marker() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billogram"))
            .and(body_json(json!({"customer": {"customer_no": 1}, "_event": "sell"})))
            .respond_with(ok(json!({"id": "new", "state": "Factoring"})))
            .expect(1)
            .mount(&server)
            .await;

        let billograms: Collection<Billogram> =
            Collection::new(client_for(&server), ObjectType::BILLOGRAM);
        let billogram = billograms
            .create_and_sell(&json!({"customer": {"customer_no": 1}}))
            .await
            .unwrap();
        assert_eq!(billogram.get("state").unwrap(), "Factoring");
    }

    #[tokio::test]
    async fn test_create_and_sell_rejects_non_object_data() {
        let server = MockServer::start().await;
        let billograms: Collection<Billogram> =
            Collection::new(client_for(&server), ObjectType::BILLOGRAM);
        let error = billograms.create_and_sell(&json!([1, 2])).await.unwrap_err();
        assert!(error.is_local());
    }

    #[tokio::test]
    async fn test_filter_state_any_joins_states() {
        let server = MockServer::start().await;
        let mut query: Query<Billogram> = Query::new(client_for(&server), ObjectType::BILLOGRAM);

        query.filter_state_any(["Unpaid", "Sold"]).unwrap();
        let filter = query.filter().unwrap();
        assert_eq!(filter.field, "state");
        assert_eq!(filter.value, "Unpaid,Sold");

        assert!(query.filter_state_any(Vec::<String>::new()).is_err());
    }
}
