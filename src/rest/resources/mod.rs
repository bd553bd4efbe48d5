//! Object types with operations beyond the generic object model.
//!
//! Items, customers and reports are plain [`RemoteObject`](crate::rest::RemoteObject)s.
//! Billogram objects add state-transition events and document retrieval.

mod billogram;

pub use billogram::{Billogram, ReminderMethod, SendMethod};
