//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to load and save it on disk.

mod load;
mod schema;

pub use load::{Session, default_log_path};
pub use schema::*;
