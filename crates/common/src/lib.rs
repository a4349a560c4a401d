//! Shared helpers for the repair-shop workspace: logging setup, startup
//! environment checks and small wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;
