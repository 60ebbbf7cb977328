//! Domain records and the in-memory table store for venuehub.
//!
//! The store exposes typed filtered-read, row-insert, and row-update
//! operations over async tables, one `RwLock` per table.

pub mod models;
mod store;

pub use store::{same_calendar_month, Store, StoreError, VenueFilter};
