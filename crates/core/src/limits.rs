//! Fixed limits and on-disk naming constants
//!
//! These values are part of the on-disk contract: existing settings, backup
//! and quarantine files are located by them.

/// Maximum accepted size of a settings file (5 MiB)
///
/// Larger files are rejected unread and treated like a corrupted file.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Upper bound on read/restore attempts during a sync
pub const SYNC_ATTEMPTS: usize = 3;

/// Extension forced on every settings file
pub const SETTINGS_EXTENSION: &str = "json";

/// Extension of the backup sibling of a settings file
pub const BACKUP_EXTENSION: &str = "backup";

/// Prefix of the extension given to a quarantined (corrupted) settings file
///
/// The spelling is kept as-is so existing quarantine files keep matching.
pub const QUARANTINE_PREFIX: &str = "currupted-";
