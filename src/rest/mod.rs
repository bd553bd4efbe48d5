//! Remote object model for the Billogram API.
//!
//! This module maps the API's uniform REST conventions onto Rust types:
//!
//! - **[`Collection`]**: an object type supporting lookup by id, creation and queries
//! - **[`RemoteObject`]**: a handle on one stored object plus its latest JSON snapshot
//! - **[`SingletonObject`]**: a resource with one instance per account, loaded lazily
//! - **[`Query`]**: filter, order and page through a collection
//! - **[`ResourceError`]**: errors of the object model, wrapping transport errors
//!
//! Domain types with their own operations, such as
//! [`Billogram`](resources::Billogram), live in the [`resources`] submodule.
//!
//! # Snapshots
//!
//! Objects do not model their fields. Field values are read from the
//! snapshot with [`RemoteObject::get`], which fails for absent fields, or
//! decoded into a caller-defined type with [`RemoteObject::deserialize`].
//! Every remote operation replaces the whole snapshot with the server's
//! answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use billogram_api::{BillogramApi, BillogramConfig};
//!
//! let mut api = BillogramApi::new(&BillogramConfig::new("api-user", "api-key")?)?;
//!
//! let mut query = api.customers().query();
//! query.search("Sventon");
//! for customer in query.get_page(1).await? {
//!     println!("{}", customer.get("name")?);
//! }
//!
//! let company = api.settings().data().await?["name"].clone();
//! ```

mod collection;
mod errors;
mod object;
mod path;
mod query;

pub mod resources;

// Public exports
pub use collection::Collection;
pub use errors::ResourceError;
pub use object::{FromRemoteObject, RemoteObject, SingletonObject};
pub use path::{attachment_path, command_path, id_to_string, pdf_path, ObjectType};
pub use query::{
    Filter, FilterType, Order, OrderDirection, Query, QueryIter, QueryParams, DEFAULT_PAGE_SIZE,
};
