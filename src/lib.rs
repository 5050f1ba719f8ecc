//! Strata Settings - durable hierarchical key-value settings
//!
//! Settings are kept in memory as a flat, sorted map from slash-separated key
//! paths to text or integer values, and persisted as a nested JSON document.
//! The file can be passed through a codec for encryption at rest, and a
//! backup/restore cycle recovers from corrupted or emptied files.
//!
//! # Quick Start
//!
//! ```ignore
//! use strata_settings::{JsonSettings, Value};
//!
//! let mut settings = JsonSettings::open_path("/var/lib/router/host.json");
//! settings.set("net/timeout", 30)?;
//! settings.set("net/host", "example")?;
//! settings.flush()?;
//!
//! assert_eq!(settings.get("net/timeout"), Some(&Value::Integer(30)));
//! ```
//!
//! # Architecture
//!
//! - `strata-settings-core`: key paths, values, flat store, errors
//! - `strata-settings-durability`: codec seam, document import/export, file
//!   I/O, backups, path composition
//! - `strata-settings-engine`: the [`JsonSettings`] engine and its recovery loop

pub use strata_settings_core::{
    split_segments, Entries, FlatStore, KeyError, KeyPath, SettingsError, SettingsResult, Value,
    BACKUP_EXTENSION, MAX_FILE_SIZE, QUARANTINE_PREFIX, SEPARATOR, SETTINGS_EXTENSION,
    SYNC_ATTEMPTS,
};
pub use strata_settings_durability::{
    backup_path, export_document, export_value, import_document, parse_document,
    quarantine_path, BackupManager, Clock, CodecError, DirectoryResolver, FixedClock,
    FixedDirectories, IdentityCodec, Scope, StorageCodec, SystemClock,
};
pub use strata_settings_engine::{
    ConfigError, JsonSettings, ReadOutcome, RecoveryAction, SettingsBuilder, SettingsConfig,
    SyncReport,
};
