//! Backup manager for settings files
//!
//! Each settings file has at most one backup: the sibling with the same stem
//! and the backup extension. When a corrupted settings file is replaced by its
//! backup, the corrupted file is first copied to a timestamped quarantine name
//! so it can be inspected later:
//!
//! ```text
//! app.json                               # settings file
//! app.backup                             # last known-good copy
//! app.currupted-20240131-235959-007      # quarantined corrupted file
//! ```
//!
//! Quarantine files are never cleaned up or overwritten by this module. If
//! the quarantine name for the current millisecond is already taken, the
//! existing file is kept and the newer corrupted copy is not stored.
//!
//! Path helpers are pure functions of a path and, for quarantine names, a
//! time supplied by an injected [`Clock`].

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use strata_settings_core::{SettingsError, SettingsResult, BACKUP_EXTENSION, QUARANTINE_PREFIX};
use tracing::{error, info, warn};

/// Source of local wall-clock time for quarantine names
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Path of the backup sibling of `path`
pub fn backup_path(path: &Path, backup_extension: &str) -> PathBuf {
    path.with_extension(backup_extension)
}

/// Path under which a corrupted `path` is quarantined at time `at`
///
/// The extension is the quarantine prefix followed by
/// `YYYYMMDD-HHMMSS-mmm`, every field zero-padded.
pub fn quarantine_path(path: &Path, at: NaiveDateTime) -> PathBuf {
    path.with_extension(format!(
        "{}{}",
        QUARANTINE_PREFIX,
        at.format("%Y%m%d-%H%M%S-%3f")
    ))
}

/// Creates, locates and restores backups of settings files
pub struct BackupManager {
    backup_extension: String,
    clock: Box<dyn Clock>,
}

impl BackupManager {
    /// Backup manager using the default backup extension and the system clock
    pub fn new() -> Self {
        BackupManager::with_clock(BACKUP_EXTENSION, Box::new(SystemClock))
    }

    /// Backup manager with an explicit backup extension and clock
    pub fn with_clock(backup_extension: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        BackupManager {
            backup_extension: backup_extension.into(),
            clock,
        }
    }

    /// Path of the backup for `path`
    pub fn backup_path(&self, path: &Path) -> PathBuf {
        backup_path(path, &self.backup_extension)
    }

    /// Whether a backup exists for `path`
    pub fn has_backup(&self, path: &Path) -> bool {
        self.backup_path(path).exists()
    }

    /// Copy `path` to its backup location, replacing any previous backup
    ///
    /// Returns `Ok(false)` without touching anything if `path` does not exist.
    pub fn create_backup(&self, path: &Path) -> SettingsResult<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let backup = self.backup_path(path);

        if backup.exists() {
            fs::remove_file(&backup).map_err(|source| {
                error!(target: "strata::settings", backup = %backup.display(), error = %source, "Unable to remove old backup file");
                backup_error(path, source)
            })?;
        }

        fs::copy(path, &backup).map_err(|source| {
            error!(target: "strata::settings", path = %path.display(), error = %source, "Unable to create backup file");
            backup_error(path, source)
        })?;

        info!(target: "strata::settings", path = %path.display(), backup = %backup.display(), "Backup created");
        Ok(true)
    }

    /// Replace `path` with its backup
    ///
    /// If `path` exists it is copied to a quarantine name (failure is logged
    /// only, an existing quarantine file is never replaced) and then removed. The backup is then copied over `path`.
    /// Returns the quarantine path if one was written.
    pub fn restore_backup(&self, path: &Path) -> SettingsResult<Option<PathBuf>> {
        let mut quarantined = None;

        if path.exists() {
            let target = quarantine_path(path, self.clock.now());

            match copy_new(path, &target) {
                Ok(_) => {
                    info!(target: "strata::settings", quarantine = %target.display(), "Corrupted settings file quarantined");
                    quarantined = Some(target);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(target: "strata::settings", quarantine = %target.display(), "Quarantine file already exists, keeping the earlier copy");
                }
                Err(e) => {
                    error!(target: "strata::settings", path = %path.display(), error = %e, "Unable to quarantine corrupted file");
                }
            }

            fs::remove_file(path).map_err(|source| {
                error!(target: "strata::settings", path = %path.display(), error = %source, "Unable to remove corrupted file");
                backup_error(path, source)
            })?;
        }

        let backup = self.backup_path(path);
        fs::copy(&backup, path).map_err(|source| {
            error!(target: "strata::settings", path = %path.display(), error = %source, "Unable to restore backup file");
            backup_error(path, source)
        })?;

        info!(target: "strata::settings", path = %path.display(), "Backup restored");
        Ok(quarantined)
    }
}

impl Default for BackupManager {
    fn default() -> Self {
        BackupManager::new()
    }
}

impl std::fmt::Debug for BackupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupManager")
            .field("backup_extension", &self.backup_extension)
            .finish_non_exhaustive()
    }
}

/// Copy `src` to `dst`, failing with `AlreadyExists` if `dst` is present
fn copy_new(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut source = File::open(src)?;
    let mut target = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let copied = io::copy(&mut source, &mut target).and_then(|n| {
        target.sync_all()?;
        Ok(n)
    });
    if copied.is_err() {
        let _ = fs::remove_file(dst);
    }
    copied
}

fn backup_error(path: &Path, source: io::Error) -> SettingsError {
    SettingsError::BackupCopy {
        path: path.to_path_buf(),
        source,
    }
}
