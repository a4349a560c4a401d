//! Storage abstractions for service layer
//!
//! One JSON file per entity, read and written whole. [`JsonDocStore`] is the
//! building block; [`FlatFileStore`] maps every entity onto it and
//! [`RawDocStore`] serves the untyped pass-through route.

pub mod json_doc_store;
pub mod repository;
pub mod raw;
pub mod flat_file;

pub use flat_file::FlatFileStore;
pub use json_doc_store::JsonDocStore;
pub use raw::RawDocStore;
pub use repository::{InMemoryRepository, Repository};
