//! Path building for remote objects.
//!
//! Every remote object lives at a path relative to the API base:
//!
//! - `<type>` for singletons, listing and creation
//! - `<type>/<id>` for fetching, updating and deleting collection members
//! - `<type>/<id>/command/<event>` for state-transition events
//! - `<type>/<id>.pdf` and `<type>/<id>/attachment.pdf` for documents
//!
//! Ids are percent-encoded before they are put into a path.
//!
//! # Example
//!
//! ```rust
//! use billogram_api::rest::{ObjectType, command_path};
//!
//! let path = ObjectType::CUSTOMER.member_path("10 01");
//! assert_eq!(path, "customer/10%2001");
//! assert_eq!(command_path("billogram/abc", "send"), "billogram/abc/command/send");
//! ```

use serde_json::Value;

/// A remote object type: its url name and the field identifying members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectType {
    /// The url name of the type (e.g., `customer`).
    pub url_name: &'static str,
    /// The field holding a member's id (e.g., `customer_no`).
    pub id_field: &'static str,
}

impl ObjectType {
    /// Items (products and services), identified by `item_no`.
    pub const ITEM: Self = Self::new("item", "item_no");
    /// Customers, identified by `customer_no`.
    pub const CUSTOMER: Self = Self::new("customer", "customer_no");
    /// Billogram (invoice) objects, identified by `id`.
    pub const BILLOGRAM: Self = Self::new("billogram", "id");
    /// Reports, identified by `filename`.
    pub const REPORT: Self = Self::new("report", "filename");

    /// Creates a new object type.
    #[must_use]
    pub const fn new(url_name: &'static str, id_field: &'static str) -> Self {
        Self { url_name, id_field }
    }

    /// Returns the path of the member with the given id.
    #[must_use]
    pub fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.url_name, urlencoding::encode(id))
    }

    /// Reads the member id out of a snapshot.
    ///
    /// Strings are used as-is and numbers in their JSON form; anything else
    /// counts as no id.
    #[must_use]
    pub fn id_of(&self, data: &serde_json::Map<String, Value>) -> Option<String> {
        id_to_string(data.get(self.id_field)?)
    }
}

/// Converts an id value to the string used in paths.
#[must_use]
pub fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the path an event is posted to.
#[must_use]
pub fn command_path(object_path: &str, event: &str) -> String {
    format!("{object_path}/command/{}", urlencoding::encode(event))
}

/// Returns the path of an object's invoice PDF.
#[must_use]
pub fn pdf_path(object_path: &str) -> String {
    format!("{object_path}.pdf")
}

/// Returns the path of an object's attachment PDF.
#[must_use]
pub fn attachment_path(object_path: &str) -> String {
    format!("{object_path}/attachment.pdf")
}
