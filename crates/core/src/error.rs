//! Error types for the settings store
//!
//! Read-side errors are absorbed by the sync recovery loop and only logged.
//! Write-side errors are returned from flush so the caller can retry.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::key::KeyError;

/// Result type alias for settings operations
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Error types for the settings store
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No usable settings path could be computed; the engine is inert
    #[error("settings path could not be resolved")]
    PathUnresolved,

    /// The settings path exists but is not a regular file
    #[error("not a file: {path}")]
    NotAFile {
        /// Offending path
        path: PathBuf,
    },

    /// The settings file exceeds the size ceiling
    #[error("settings file too large: {path} ({size} bytes, max {max})")]
    TooLarge {
        /// Offending path
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Size ceiling in bytes
        max: u64,
    },

    /// Reading the settings file failed
    #[error("failed to read {path}: {source}")]
    ReadIo {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The codec could not decrypt the file contents
    #[error("failed to decrypt {path}: {detail}")]
    DecryptFailure {
        /// Offending path
        path: PathBuf,
        /// Codec diagnostic
        detail: String,
    },

    /// The file contents are not a well-formed settings document
    #[error("settings file is damaged: {path} ({detail})")]
    Parse {
        /// Offending path
        path: PathBuf,
        /// Parser diagnostic
        detail: String,
    },

    /// Writing the settings file failed
    #[error("failed to write {path}: {source}")]
    WriteIo {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The codec could not encrypt the serialized document
    #[error("failed to encrypt settings: {detail}")]
    EncryptFailure {
        /// Codec diagnostic
        detail: String,
    },

    /// Copying to or from the backup file failed
    #[error("backup copy failed for {path}: {source}")]
    BackupCopy {
        /// Settings path the backup belongs to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Creating the settings directory failed
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The exporter finished with unbalanced nesting
    #[error("incomplete settings document")]
    IncompleteDocument,

    /// A key path was rejected
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),
}

impl SettingsError {
    /// Whether this error comes from the read side
    ///
    /// Read-side errors never escape a sync; they drive backup recovery.
    pub fn is_read_side(&self) -> bool {
        matches!(
            self,
            SettingsError::NotAFile { .. }
                | SettingsError::TooLarge { .. }
                | SettingsError::ReadIo { .. }
                | SettingsError::DecryptFailure { .. }
                | SettingsError::Parse { .. }
        )
    }
}
