//! Entity shapes of the repair shop and the table that maps each entity
//! name to its backing JSON file.
//!
//! All shapes serialize with camelCase field names. Non-identity fields
//! default when absent so that documents written by older revisions load.

pub mod errors;
pub mod entity;
pub mod customer;
pub mod service_order;
pub mod stock;
pub mod sale;
pub mod finance;
pub mod user;
pub mod company;
pub mod appointment;
pub mod quote;
pub mod kit;
pub mod settings;
pub mod session;

pub use entity::{Document, EntityKind};

/// Generate a record id. Call sites own id generation; the store never
/// checks uniqueness.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
