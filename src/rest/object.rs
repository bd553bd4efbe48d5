//! Remote objects and their local snapshots.
//!
//! A [`RemoteObject`] is a handle on one object stored by the API together
//! with the JSON data last received for it (its snapshot). Every operation
//! that talks to the API replaces the whole snapshot with what the server
//! returned; nothing is ever merged.
//!
//! Collection members are addressed as `<type>/<id>`, with the id read from
//! the snapshot. Per-account singletons such as settings are wrapped in a
//! [`SingletonObject`], which cannot be deleted and is fetched lazily on
//! first access.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut customer = api.customers().get("1001").await?;
//! println!("{}", customer.get("name")?);
//!
//! customer.update(&json!({"name": "Ture Sventon"})).await?;
//! customer.delete().await?;
//! ```

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::clients::HttpClient;
use crate::rest::{ObjectType, ResourceError};

/// Where an object lives relative to the API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Singleton(&'static str),
    Member(ObjectType),
}

/// A handle on a remote object and its latest snapshot.
///
/// Values are created by [`Collection`](crate::rest::Collection) lookups,
/// creations and queries. Mutating operations take `&mut self`; [`delete`]
/// consumes the handle, since nothing meaningful can be done with a deleted
/// object.
///
/// [`delete`]: Self::delete
#[derive(Debug, Clone)]
pub struct RemoteObject {
    client: Arc<HttpClient>,
    location: Location,
    data: Option<Map<String, Value>>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RemoteObject>();
};

impl RemoteObject {
    /// Wraps member data received from the API.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResponse`] if `data` is not a JSON
    /// object.
    pub(crate) fn from_snapshot(
        client: Arc<HttpClient>,
        object_type: ObjectType,
        data: Value,
    ) -> Result<Self, ResourceError> {
        let mut object = Self {
            client,
            location: Location::Member(object_type),
            data: None,
        };
        object.replace_snapshot(data)?;
        Ok(object)
    }

    const fn singleton(client: Arc<HttpClient>, url_name: &'static str) -> Self {
        Self {
            client,
            location: Location::Singleton(url_name),
            data: None,
        }
    }

    /// Returns the object type, or `None` for a singleton.
    #[must_use]
    pub const fn object_type(&self) -> Option<ObjectType> {
        match self.location {
            Location::Member(object_type) => Some(object_type),
            Location::Singleton(_) => None,
        }
    }

    /// Returns the object's id as read from its snapshot.
    ///
    /// Singletons and unloaded objects have no id.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match (self.location, &self.data) {
            (Location::Member(object_type), Some(data)) => object_type.id_of(data),
            _ => None,
        }
    }

    /// Returns the object's path relative to the API base.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if the snapshot of a collection
    /// member has no usable id.
    pub fn path(&self) -> Result<String, ResourceError> {
        match self.location {
            Location::Singleton(url_name) => Ok(url_name.to_string()),
            Location::Member(object_type) => self
                .id()
                .map(|id| object_type.member_path(&id))
                .ok_or(ResourceError::MissingId {
                    object_type: object_type.url_name,
                    id_field: object_type.id_field,
                }),
        }
    }

    /// Returns `true` once a snapshot has been received.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the current snapshot without fetching anything.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    /// Returns the snapshot, fetching it first if it was never loaded.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch, if one was needed.
    pub async fn data(&mut self) -> Result<&Map<String, Value>, ResourceError> {
        if self.data.is_none() {
            self.refresh().await?;
        }
        self.data.as_ref().ok_or_else(|| self.not_loaded())
    }

    /// Reads one field from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::FieldAbsent`] if the snapshot has no such
    /// field, or [`ResourceError::NotLoaded`] if there is no snapshot yet.
    pub fn get(&self, key: &str) -> Result<&Value, ResourceError> {
        let data = self.data.as_ref().ok_or_else(|| self.not_loaded())?;
        data.get(key).ok_or_else(|| ResourceError::FieldAbsent {
            field: key.to_string(),
            object: self.describe(),
        })
    }

    /// Reads one field, fetching the snapshot first if it was never loaded.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch, if one was needed, or
    /// [`ResourceError::FieldAbsent`] if the snapshot has no such field.
    pub async fn field(&mut self, key: &str) -> Result<&Value, ResourceError> {
        if self.data.is_none() {
            self.refresh().await?;
        }
        self.get(key)
    }

    /// Decodes the snapshot into a caller-defined type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] if there is no snapshot yet and
    /// [`ResourceError::Serialization`] if the snapshot does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        let data = self.data.as_ref().ok_or_else(|| self.not_loaded())?;
        Ok(serde_json::from_value(Value::Object(data.clone()))?)
    }

    /// Fetches the object and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error. The snapshot is left
    /// unchanged on failure.
    pub async fn refresh(&mut self) -> Result<(), ResourceError> {
        let path = self.path()?;
        tracing::debug!(path = %path, "Refreshing object");
        let envelope = self.client.get(&path, None).await?;
        self.replace_snapshot(envelope.data)
    }

    /// Sends new field values and replaces the snapshot with the stored
    /// object returned by the API.
    ///
    /// `data` may hold any subset of the object's fields.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error. The snapshot is left
    /// unchanged on failure.
    pub async fn update<D: Serialize + ?Sized>(&mut self, data: &D) -> Result<(), ResourceError> {
        let path = self.path()?;
        let body = serde_json::to_value(data)?;
        tracing::debug!(path = %path, "Updating object");
        let envelope = self.client.put(&path, body).await?;
        self.replace_snapshot(envelope.data)
    }

    /// Deletes the object.
    ///
    /// # Errors
    ///
    /// Returns the transport or classified API error.
    pub async fn delete(self) -> Result<(), ResourceError> {
        let path = self.path()?;
        tracing::debug!(path = %path, "Deleting object");
        self.client.delete(&path).await?;
        Ok(())
    }

    /// Replaces the snapshot with `data` received from the API.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResponse`] if `data` is not a JSON
    /// object; the old snapshot is kept in that case.
    pub(crate) fn replace_snapshot(&mut self, data: Value) -> Result<(), ResourceError> {
        match data {
            Value::Object(map) => {
                self.data = Some(map);
                Ok(())
            }
            other => Err(ResourceError::InvalidResponse(format!(
                "expected an object for {}, got {other}",
                self.describe()
            ))),
        }
    }

    pub(crate) const fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    fn describe(&self) -> String {
        self.path().unwrap_or_else(|_| match self.location {
            Location::Singleton(url_name) => url_name.to_string(),
            Location::Member(object_type) => format!("unsaved {}", object_type.url_name),
        })
    }

    fn not_loaded(&self) -> ResourceError {
        ResourceError::NotLoaded {
            object: self.describe(),
        }
    }
}

/// Conversion from a plain [`RemoteObject`] into a richer object type.
///
/// Collections and queries produce values of any type implementing this
/// trait, so a domain type like
/// [`Billogram`](crate::rest::resources::Billogram) comes back from
/// lookups already wrapped.
pub trait FromRemoteObject: Sized {
    /// Wraps the object.
    fn from_remote_object(object: RemoteObject) -> Self;
}

impl FromRemoteObject for RemoteObject {
    fn from_remote_object(object: RemoteObject) -> Self {
        object
    }
}

/// A resource with exactly one instance per account.
///
/// The object is fetched on first access through [`data`](Self::data) and
/// can be refreshed and updated, but never deleted.
#[derive(Debug, Clone)]
pub struct SingletonObject {
    inner: RemoteObject,
}

impl SingletonObject {
    /// Creates an unloaded handle on the singleton at `url_name`.
    pub(crate) const fn new(client: Arc<HttpClient>, url_name: &'static str) -> Self {
        Self {
            inner: RemoteObject::singleton(client, url_name),
        }
    }

    /// Returns the singleton's path (its url name).
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self.inner.location {
            Location::Singleton(url_name) => url_name,
            Location::Member(object_type) => object_type.url_name,
        }
    }

    /// Returns `true` once a snapshot has been received.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    /// Returns the current snapshot without fetching anything.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Map<String, Value>> {
        self.inner.snapshot()
    }

    /// Returns the snapshot, fetching it on first access.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch, if one was needed.
    pub async fn data(&mut self) -> Result<&Map<String, Value>, ResourceError> {
        self.inner.data().await
    }

    /// Reads one field from the snapshot.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::get`].
    pub fn get(&self, key: &str) -> Result<&Value, ResourceError> {
        self.inner.get(key)
    }

    /// Reads one field, fetching the singleton on first access.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::field`].
    pub async fn field(&mut self, key: &str) -> Result<&Value, ResourceError> {
        self.inner.field(key).await
    }

    /// Decodes the snapshot into a caller-defined type.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::deserialize`].
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        self.inner.deserialize()
    }

    /// Fetches the singleton and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::refresh`].
    pub async fn refresh(&mut self) -> Result<(), ResourceError> {
        self.inner.refresh().await
    }

    /// Sends new field values and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// See [`RemoteObject::update`].
    pub async fn update<D: Serialize + ?Sized>(&mut self, data: &D) -> Result<(), ResourceError> {
        self.inner.update(data).await
    }
}
