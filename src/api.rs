//! The connection object tying configuration, transport and resources
//! together.

use std::sync::{Arc, OnceLock};

use crate::clients::{HttpClient, HttpError};
use crate::config::BillogramConfig;
use crate::rest::resources::Billogram;
use crate::rest::{Collection, ObjectType, SingletonObject};

/// A connection to the Billogram API.
///
/// Resource accessors are memoized: each collection or singleton is created
/// on first access and the same instance is returned for the lifetime of
/// the connection. Collections are stateless and handed out through
/// `&self`. Singletons cache their snapshot, so they need `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use billogram_api::{BillogramApi, BillogramConfig};
/// use billogram_api::rest::resources::SendMethod;
///
/// let config = BillogramConfig::new("api-user", "api-key")?;
/// let mut api = BillogramApi::new(&config)?;
///
/// let customer = api.customers().get("1001").await?;
/// let billogram = api
///     .billogram()
///     .create_and_send(&json!({"customer": {"customer_no": 1001}, "items": []}), SendMethod::Email)
///     .await?;
/// let settings = api.settings().data().await?;
/// ```
#[derive(Debug)]
pub struct BillogramApi {
    client: Arc<HttpClient>,
    items: OnceLock<Collection>,
    customers: OnceLock<Collection>,
    billogram: OnceLock<Collection<Billogram>>,
    reports: OnceLock<Collection>,
    settings: Option<SingletonObject>,
    logotype: Option<SingletonObject>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BillogramApi>();
};

impl BillogramApi {
    /// Opens a connection with the given configuration.
    ///
    /// No request is made until a resource is used.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &BillogramConfig) -> Result<Self, HttpError> {
        let client = HttpClient::new(config)?;
        let api_base: &str = config.api_base().as_ref();
        tracing::debug!(api_base, "Created Billogram API connection");
        Ok(Self {
            client: Arc::new(client),
            items: OnceLock::new(),
            customers: OnceLock::new(),
            billogram: OnceLock::new(),
            reports: OnceLock::new(),
            settings: None,
            logotype: None,
        })
    }

    /// Returns the transport client, for requests the object model does
    /// not cover.
    #[must_use]
    pub const fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Items: products and services that can be put on a billogram.
    #[must_use]
    pub fn items(&self) -> &Collection {
        self.items
            .get_or_init(|| Collection::new(Arc::clone(&self.client), ObjectType::ITEM))
    }

    /// Customers.
    #[must_use]
    pub fn customers(&self) -> &Collection {
        self.customers
            .get_or_init(|| Collection::new(Arc::clone(&self.client), ObjectType::CUSTOMER))
    }

    /// Billogram (invoice) objects.
    #[must_use]
    pub fn billogram(&self) -> &Collection<Billogram> {
        self.billogram
            .get_or_init(|| Collection::new(Arc::clone(&self.client), ObjectType::BILLOGRAM))
    }

    /// Reports, identified by file name.
    #[must_use]
    pub fn reports(&self) -> &Collection {
        self.reports
            .get_or_init(|| Collection::new(Arc::clone(&self.client), ObjectType::REPORT))
    }

    /// The account settings.
    pub fn settings(&mut self) -> &mut SingletonObject {
        self.settings
            .get_or_insert_with(|| SingletonObject::new(Arc::clone(&self.client), "settings"))
    }

    /// The account logotype.
    pub fn logotype(&mut self) -> &mut SingletonObject {
        self.logotype
            .get_or_insert_with(|| SingletonObject::new(Arc::clone(&self.client), "logotype"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiBaseUrl, AuthKey, AuthUser};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> BillogramApi {
        let config = BillogramConfig::builder()
            .auth_user(AuthUser::new("test-user").unwrap())
            .auth_key(AuthKey::new("test-key").unwrap())
            .api_base(ApiBaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap();
        BillogramApi::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_collections_are_memoized() {
        let server = MockServer::start().await;
        let api = api_for(&server);

        assert!(std::ptr::eq(api.items(), api.items()));
        assert!(std::ptr::eq(api.billogram(), api.billogram()));
        assert_eq!(api.customers().object_type(), ObjectType::CUSTOMER);
        assert_eq!(api.reports().object_type().id_field, "filename");
    }

    #[tokio::test]
    async fn test_settings_snapshot_is_kept_across_accesses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "data": {"name": "Acme AB"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut api = api_for(&server);
        api.settings().data().await.unwrap();
        assert!(api.settings().is_loaded());
        assert_eq!(api.settings().get("name").unwrap(), "Acme AB");
        assert!(!api.logotype().is_loaded());
        assert_eq!(api.logotype().path(), "logotype");
    }
}
