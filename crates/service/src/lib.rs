//! Service layer for the repair shop.
//! - `storage`: one JSON file per entity, read and replaced whole.
//! - `session`: login state persisted in the `session` entity.
//! - `user_service`: user account maintenance over the users document.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod session;
pub mod user_service;
