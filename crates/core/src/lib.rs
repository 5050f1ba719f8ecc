//! Core types for Strata settings
//!
//! This crate defines the in-memory model shared by the other crates:
//! - KeyPath: normalized sequence of path segments
//! - Value: Text or Integer scalar
//! - FlatStore: canonical key -> value, iterated in byte-wise key order
//! - SettingsError: error taxonomy for read, write and backup paths
//! - Limits: size ceiling and on-disk naming constants

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod limits;
pub mod store;
pub mod value;

pub use error::{SettingsError, SettingsResult};
pub use key::{split_segments, KeyError, KeyPath, SEPARATOR};
pub use limits::{
    BACKUP_EXTENSION, MAX_FILE_SIZE, QUARANTINE_PREFIX, SETTINGS_EXTENSION, SYNC_ATTEMPTS,
};
pub use store::{Entries, FlatStore};
pub use value::Value;
