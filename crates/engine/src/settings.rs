//! JSON settings engine
//!
//! [`JsonSettings`] owns a settings file path, the in-memory [`FlatStore`] and
//! a changed flag. Construction loads the file through the recovery loop;
//! [`JsonSettings::flush`] writes it back, taking a backup first; dropping the
//! engine flushes.
//!
//! # Error policy
//!
//! - Read-side failures never escape [`JsonSettings::sync`]; they drive backup
//!   recovery and are logged. The caller always gets a usable, possibly empty,
//!   store.
//! - Write-side failures are returned from [`JsonSettings::flush`] and leave
//!   the changed flag set so a later flush retries.
//! - Backup creation is best effort: failures are logged and never block a
//!   read or a write.
//!
//! # Threading
//!
//! All operations block on file I/O. An instance is not synchronized; share
//! it across threads only behind an external lock. Nothing coordinates two
//! processes using the same path.
//!
//! # Example
//!
//! ```ignore
//! let mut settings = JsonSettings::builder().open_path("/var/lib/app/host.json");
//! settings.set("net/timeout", 30)?;
//! settings.set("net/host", "example")?;
//! settings.flush()?;
//! ```

use std::path::{Path, PathBuf};

use strata_settings_core::{
    Entries, FlatStore, KeyPath, SettingsError, SettingsResult, Value,
};
use strata_settings_durability::{
    exec_dir_file_path, file_path_in_dir, is_writable, read_settings_file, scoped_file_path,
    write_settings_file, BackupManager, Clock, DirectoryResolver, IdentityCodec, Scope,
    StorageCodec, SystemClock,
};
use tracing::{debug, error, info, warn};

use crate::config::SettingsConfig;
use crate::recovery::{next_action, ReadOutcome, RecoveryAction, SyncReport};

/// Builder for [`JsonSettings`]
///
/// Collects the collaborators (config, codec, clock) and resolves the settings
/// path in one of three ways: explicit path, next to the executable, or under
/// a scoped application directory.
pub struct SettingsBuilder {
    config: SettingsConfig,
    codec: Box<dyn StorageCodec>,
    clock: Box<dyn Clock>,
}

impl SettingsBuilder {
    fn new() -> Self {
        SettingsBuilder {
            config: SettingsConfig::default(),
            codec: Box::new(IdentityCodec),
            clock: Box::new(SystemClock),
        }
    }

    /// Use this configuration
    ///
    /// The configuration is validated when the engine is opened. An invalid
    /// one is logged and replaced by the defaults, keeping only its
    /// encryption flag.
    pub fn config(mut self, config: SettingsConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this codec when encryption is enabled
    pub fn codec(mut self, codec: Box<dyn StorageCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Use this clock for quarantine file names
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open the settings file at `path`, forcing the settings extension
    pub fn open_path(self, path: impl AsRef<Path>) -> JsonSettings {
        let builder = self.validated();
        let path = path.as_ref();
        let resolved = match (path.parent(), path.file_name()) {
            (Some(dir), Some(name)) => {
                file_path_in_dir(dir, &name.to_string_lossy(), &builder.config.settings_extension)
            }
            _ => None,
        };
        builder.build(resolved)
    }

    /// Open `<executable dir>/<file_name>.<ext>`
    pub fn open_exec_dir(self, file_name: &str) -> JsonSettings {
        let builder = self.validated();
        let resolved = exec_dir_file_path(file_name, &builder.config.settings_extension);
        builder.build(resolved)
    }

    /// Open `<scope dir>/<application_name>/<file_name>.<ext>`
    pub fn open_scoped(
        self,
        resolver: &dyn DirectoryResolver,
        scope: Scope,
        application_name: &str,
        file_name: &str,
    ) -> JsonSettings {
        let builder = self.validated();
        let resolved = scoped_file_path(
            resolver,
            scope,
            application_name,
            file_name,
            &builder.config.settings_extension,
        );
        builder.build(resolved)
    }

    /// Replace an invalid config before any path is derived from it
    fn validated(mut self) -> Self {
        if let Err(e) = self.config.validate() {
            error!(target: "strata::settings", error = %e, "Rejected settings config, using defaults");
            self.config = SettingsConfig::default().with_encryption(self.config.encrypted);
        }
        self
    }

    fn build(self, path: Option<PathBuf>) -> JsonSettings {
        if path.is_none() {
            warn!(target: "strata::settings", "Settings path could not be resolved; settings are in-memory only");
        }

        let backups = BackupManager::with_clock(self.config.backup_extension.clone(), self.clock);
        let mut settings = JsonSettings {
            path,
            store: FlatStore::new(),
            changed: false,
            config: self.config,
            codec: self.codec,
            backups,
        };
        settings.sync();
        settings
    }
}

/// Durable hierarchical settings backed by a JSON file
pub struct JsonSettings {
    path: Option<PathBuf>,
    store: FlatStore,
    changed: bool,
    config: SettingsConfig,
    codec: Box<dyn StorageCodec>,
    backups: BackupManager,
}

impl JsonSettings {
    /// Start configuring a settings engine
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Open `<executable dir>/<file_name>.json` with default configuration
    pub fn open(file_name: &str) -> Self {
        Self::builder().open_exec_dir(file_name)
    }

    /// Open `<scope dir>/<application_name>/<file_name>.json` with default configuration
    pub fn open_scoped(
        resolver: &dyn DirectoryResolver,
        scope: Scope,
        application_name: &str,
        file_name: &str,
    ) -> Self {
        Self::builder().open_scoped(resolver, scope, application_name, file_name)
    }

    /// Open the settings file at `path` with default configuration
    pub fn open_path(path: impl AsRef<Path>) -> Self {
        Self::builder().open_path(path)
    }

    /// Resolved settings file path, `None` if the engine is disabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Path of the backup sibling, `None` if the engine is disabled
    pub fn backup_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(|p| self.backups.backup_path(p))
    }

    /// Active configuration
    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// Whether in-memory changes are not yet written
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Underlying flat store
    pub fn store(&self) -> &FlatStore {
        &self.store
    }

    /// Value at `key`; `None` if absent or the key is invalid
    pub fn get(&self, key: &str) -> Option<&Value> {
        let path = KeyPath::parse(key).ok()?;
        self.store.get(&path)
    }

    /// Text at `key`, rendering integers in decimal, or `default`
    pub fn get_text(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map(Value::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer at `key` (numeric text accepted), or `default`
    pub fn get_integer(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::to_integer).unwrap_or(default)
    }

    /// Set `key` to `value` and mark the settings changed
    ///
    /// A nested document cannot hold both a value at `a` and values below
    /// `a/`. Such a pair is accepted in memory, but the value at the shorter
    /// key is dropped when the settings are written. A warning is logged here
    /// when the new key creates such a pair.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> SettingsResult<()> {
        let path = KeyPath::parse(key)?;
        if let Some(shadowed) = self.store.shadowed_by(&path) {
            warn!(
                target: "strata::settings",
                key = %path,
                shadowed = %shadowed,
                "Key conflicts with a nested key; the shorter key will not be written"
            );
        }
        self.store.insert(&path, value);
        self.changed = true;
        Ok(())
    }

    /// Remove `key`, marking the settings changed if a value was removed
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let path = KeyPath::parse(key).ok()?;
        let removed = self.store.remove(&path);
        if removed.is_some() {
            self.changed = true;
        }
        removed
    }

    /// Whether a value exists at `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no values are stored
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Canonical keys in lexicographic order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    /// `(key, value)` pairs in lexicographic key order
    pub fn entries(&self) -> Entries<'_> {
        self.store.entries()
    }

    fn codec(&self) -> Option<&dyn StorageCodec> {
        if self.config.encrypted {
            Some(self.codec.as_ref())
        } else {
            None
        }
    }

    /// Reload from disk, recovering from the backup if needed
    ///
    /// Always clears the changed flag: the loaded state is the new baseline,
    /// even when nothing could be read.
    pub fn sync(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        let Some(path) = self.path.clone() else {
            debug!(target: "strata::settings", "Sync skipped, no settings path");
            self.changed = false;
            return report;
        };

        for attempt in 1..=self.config.sync_attempts {
            report.attempts = attempt;
            debug!(target: "strata::settings", path = %path.display(), attempt, "Reading settings");

            let outcome = match read_settings_file(&path, self.codec(), self.config.max_file_size)
            {
                Ok(store) => {
                    self.store = store;
                    if self.store.is_empty() {
                        ReadOutcome::Empty
                    } else {
                        ReadOutcome::NonEmpty
                    }
                }
                Err(e) => {
                    debug_assert!(e.is_read_side(), "unexpected read error: {}", e);
                    self.store.clear();
                    ReadOutcome::Failed
                }
            };
            report.outcome = Some(outcome);

            match next_action(outcome, self.backups.has_backup(&path)) {
                RecoveryAction::CreateBackup => {
                    match self.backups.create_backup(&path) {
                        Ok(created) => report.backup_created = created,
                        Err(e) => {
                            error!(target: "strata::settings", path = %path.display(), error = %e, "Initial backup failed");
                        }
                    }
                    break;
                }
                RecoveryAction::Done => break,
                RecoveryAction::RestoreAndRetry => {
                    warn!(
                        target: "strata::settings",
                        path = %path.display(),
                        ?outcome,
                        "Settings file is empty or corrupted, restoring from backup"
                    );
                    match self.backups.restore_backup(&path) {
                        Ok(quarantined) => {
                            report.restores += 1;
                            report.quarantined.extend(quarantined);
                        }
                        Err(e) => {
                            error!(target: "strata::settings", path = %path.display(), error = %e, "Backup restore failed");
                        }
                    }
                }
                RecoveryAction::GiveUp => {
                    if outcome == ReadOutcome::Failed {
                        warn!(target: "strata::settings", path = %path.display(), "Settings file is corrupted and no backup exists");
                    } else {
                        debug!(target: "strata::settings", path = %path.display(), "Settings file is empty and no backup exists");
                    }
                    break;
                }
            }
        }

        if report.restores > 0 {
            info!(
                target: "strata::settings",
                path = %path.display(),
                restores = report.restores,
                entries = self.store.len(),
                "Settings recovered from backup"
            );
        }

        self.changed = false;
        report
    }

    /// Write in-memory changes to disk
    ///
    /// No-op when nothing changed. Otherwise backs up the current file (best
    /// effort), then writes the whole document. On failure the changed flag
    /// stays set.
    pub fn flush(&mut self) -> SettingsResult<()> {
        if !self.changed {
            debug!(target: "strata::settings", "Flush skipped, no changes");
            return Ok(());
        }

        let Some(path) = self.path.as_deref() else {
            return Err(SettingsError::PathUnresolved);
        };

        if let Err(e) = self.backups.create_backup(path) {
            error!(target: "strata::settings", path = %path.display(), error = %e, "Backup before write failed");
        }

        write_settings_file(path, &self.store, self.codec())?;
        self.changed = false;
        Ok(())
    }

    /// Whether the settings file can be written
    pub fn is_writable(&self) -> bool {
        self.path.as_deref().is_some_and(is_writable)
    }
}

impl Drop for JsonSettings {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!(target: "strata::settings", error = %e, "Failed to flush settings on drop");
        }
    }
}

impl std::fmt::Debug for JsonSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSettings")
            .field("path", &self.path)
            .field("entries", &self.store.len())
            .field("changed", &self.changed)
            .field("encrypted", &self.config.encrypted)
            .finish_non_exhaustive()
    }
}
