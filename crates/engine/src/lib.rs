//! Settings engine for Strata
//!
//! This crate orchestrates the lower layers:
//! - JsonSettings: in-memory store, changed flag, sync and flush
//! - Recovery: bounded read/restore loop driven by a pure transition function
//! - Config: engine configuration, loadable from TOML
//!
//! The engine is the only component that knows about:
//! - When to take and restore backups
//! - Which errors are absorbed and which are returned

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod recovery;
pub mod settings;

pub use config::{ConfigError, SettingsConfig};
pub use recovery::{next_action, ReadOutcome, RecoveryAction, SyncReport};
pub use settings::{JsonSettings, SettingsBuilder};
