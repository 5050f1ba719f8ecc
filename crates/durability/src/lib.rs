//! Durability layer for Strata settings
//!
//! This crate handles everything that touches disk:
//!
//! - Codec: encryption seam around the whole serialized document
//! - Document: tree importer/exporter between nested JSON and the flat store
//! - File: size-checked reads, write-fsync-rename writes, writability probe
//! - Backup: backup sibling, restore, quarantine of corrupted files
//! - Paths: settings path composition and the directory-resolution seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;
pub mod codec;
pub mod document;
pub mod file;
pub mod paths;

pub use backup::{backup_path, quarantine_path, BackupManager, Clock, FixedClock, SystemClock};
pub use codec::{CodecError, IdentityCodec, StorageCodec};
pub use document::{export_document, export_value, import_document, parse_document, DocumentWriter};
pub use file::{is_writable, read_settings_file, write_settings_file};
pub use paths::{
    exec_dir_file_path, file_path_in_dir, scoped_file_path, DirectoryResolver, FixedDirectories,
    Scope,
};
