//! Collections of remote objects.
//!
//! A [`Collection`] is bound to one object type and hands out queries,
//! fetches members by id, and creates new members. The type parameter
//! chooses what members are wrapped in; it defaults to a plain
//! [`RemoteObject`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::clients::HttpClient;
use crate::rest::{FromRemoteObject, ObjectType, Query, RemoteObject, ResourceError};

/// A remote object type supporting lookup, creation and queries.
///
/// # Example
///
/// ```rust,ignore
/// let items = api.items();
///
/// let item = items.get("12").await?;
/// let created = items.create(&json!({"title": "Consulting", "price": 1200})).await?;
/// let first_page = items.query().order_by("title", OrderDirection::Asc).get_page(1).await?;
/// ```
pub struct Collection<T = RemoteObject> {
    client: Arc<HttpClient>,
    object_type: ObjectType,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            object_type: self.object_type,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("object_type", &self.object_type)
            .finish_non_exhaustive()
    }
}

impl<T: FromRemoteObject> Collection<T> {
    /// Creates a collection of `object_type` members.
    #[must_use]
    pub const fn new(client: Arc<HttpClient>, object_type: ObjectType) -> Self {
        Self {
            client,
            object_type,
            _marker: PhantomData,
        }
    }

    /// Returns the object type of the members.
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Returns a new, unfiltered query over the collection.
    #[must_use]
    pub fn query(&self) -> Query<T> {
        Query::new(Arc::clone(&self.client), self.object_type)
    }

    /// Fetches the member with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ObjectNotFound`](crate::clients::ApiError::ObjectNotFound)
    /// (inside [`ResourceError::Http`]) if there is no such member.
    pub async fn get(&self, id: &str) -> Result<T, ResourceError> {
        if id.is_empty() {
            return Err(ResourceError::invalid_argument("id", "must not be empty"));
        }
        let path = self.object_type.member_path(id);
        tracing::debug!(path = %path, "Fetching object");
        let envelope = self.client.get(&path, None).await?;
        self.wrap(envelope.data)
    }

    /// Creates a new member from `data` and returns it as stored by the API.
    ///
    /// # Errors
    ///
    /// Returns a classified API error if the data is rejected.
    pub async fn create<D: Serialize + ?Sized>(&self, data: &D) -> Result<T, ResourceError> {
        let body = serde_json::to_value(data)?;
        tracing::debug!(object_type = self.object_type.url_name, "Creating object");
        let envelope = self.client.post(self.object_type.url_name, body).await?;
        self.wrap(envelope.data)
    }

    fn wrap(&self, data: serde_json::Value) -> Result<T, ResourceError> {
        let object = RemoteObject::from_snapshot(Arc::clone(&self.client), self.object_type, data)?;
        Ok(T::from_remote_object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ApiError;
    use crate::config::{ApiBaseUrl, AuthKey, AuthUser, BillogramConfig};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn items_for(server: &MockServer) -> Collection {
        let config = BillogramConfig::builder()
            .auth_user(AuthUser::new("test-user").unwrap())
            .auth_key(AuthKey::new("test-key").unwrap())
            .api_base(ApiBaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap();
        Collection::new(Arc::new(HttpClient::new(&config).unwrap()), ObjectType::ITEM)
    }

    #[tokio::test]
    async fn test_get_fetches_member() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "data": {"item_no": 12, "title": "Consulting"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = items_for(&server).get("12").await.unwrap();
        assert_eq!(item.get("title").unwrap(), "Consulting");
        assert_eq!(item.id().as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_get_unknown_member_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "NOT_FOUND",
                "data": {"message": "No such item"}
            })))
            .mount(&server)
            .await;

        let error = items_for(&server).get("99").await.unwrap_err();
        assert!(matches!(error.api_error(), Some(ApiError::ObjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_rejects_empty_id_locally() {
        let server = MockServer::start().await;
        let error = items_for(&server).get("").await.unwrap_err();
        assert!(error.is_local());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_posts_to_collection_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/item"))
            .and(body_json(json!({"title": "Hours", "price": 800})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "data": {"item_no": 13, "title": "Hours", "price": 800}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = items_for(&server)
            .create(&json!({"title": "Hours", "price": 800}))
            .await
            .unwrap();
        assert_eq!(item.path().unwrap(), "item/13");
    }
}
