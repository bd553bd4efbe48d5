//! # Billogram API Rust Library
//!
//! A client library for the Billogram invoicing API, translating method
//! calls into authenticated HTTP requests and API responses into objects or
//! typed errors.
//!
//! ## Overview
//!
//! This library provides:
//! - Type-safe configuration via [`BillogramConfig`] and [`BillogramConfigBuilder`]
//! - Validated newtypes for credentials and the API base URL
//! - An async HTTP transport with basic authentication ([`HttpClient`])
//! - Classification of every response into a payload or an [`ApiError`]
//! - Collections, objects and paged queries over the API's REST conventions
//! - Billogram (invoice) state-transition events and PDF retrieval
//!
//! ## Quick Start
//!
//! ```rust
//! use billogram_api::{ApiBaseUrl, AuthKey, AuthUser, BillogramConfig};
//! use std::time::Duration;
//!
//! // Credentials only, against the production API
//! let config = BillogramConfig::new("20561-3vhGtAxH", "4a6c2e0f2a2c5b0b").unwrap();
//! assert_eq!(config.api_base().join("settings"), "https://billogram.com/api/v2/settings");
//!
//! // Or with the builder
//! let config = BillogramConfig::builder()
//!     .auth_user(AuthUser::new("20561-3vhGtAxH").unwrap())
//!     .auth_key(AuthKey::new("4a6c2e0f2a2c5b0b").unwrap())
//!     .api_base(ApiBaseUrl::new("https://sandbox.billogram.com/api/v2").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Working With Objects
//!
//! ```rust,ignore
//! use billogram_api::{BillogramApi, BillogramConfig};
//! use billogram_api::rest::resources::SendMethod;
//! use serde_json::json;
//!
//! let mut api = BillogramApi::new(&BillogramConfig::new("api-user", "api-key")?)?;
//!
//! // Create a customer and an invoice for it, and send the invoice
//! let customer = api.customers().create(&json!({
//!     "name": "Ture Sventon",
//!     "contact": {"email": "ture@example.com"}
//! })).await?;
//!
//! let billogram = api.billogram().create_and_send(&json!({
//!     "customer": {"customer_no": customer.get("customer_no")?},
//!     "items": [{"title": "Consulting", "price": 1200, "count": 2, "vat": 25}]
//! }), SendMethod::Email).await?;
//!
//! // Page through unpaid invoices
//! let mut query = api.billogram().query();
//! query.filter_state_any(["Unpaid"])?;
//! let mut unpaid = query.iter_all();
//! while let Some(billogram) = unpaid.next().await {
//!     println!("{}", billogram?.get("id")?);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Classified API errors are variants of [`ApiError`], so callers can match
//! one specific kind or ask for a family:
//!
//! ```rust,ignore
//! use billogram_api::ApiError;
//!
//! match api.billogram().get("abc").await {
//!     Ok(billogram) => println!("{:?}", billogram.snapshot()),
//!     Err(e) if e.api_error().is_some_and(ApiError::is_not_found) => println!("gone"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and convenience methods validate locally
//! - **No retries**: Every failure surfaces to the caller immediately
//! - **Async-first**: Designed for use with the Tokio async runtime

mod api;

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use api::BillogramApi;
pub use config::{ApiBaseUrl, AuthKey, AuthUser, BillogramConfig, BillogramConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ApiErrorKind, ErrorDetails, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, InvalidHttpRequestError, ResponseEnvelope,
};

// Re-export object model types
pub use rest::{Collection, Query, RemoteObject, ResourceError, SingletonObject};
