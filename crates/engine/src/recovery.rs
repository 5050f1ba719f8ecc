//! Sync recovery state machine
//!
//! Each sync attempt reads the settings file and classifies the result. The
//! classification and whether a backup exists select the next action:
//!
//! | Outcome   | Backup | Action                          |
//! |-----------|--------|---------------------------------|
//! | NonEmpty  | no     | create backup, stop             |
//! | NonEmpty  | yes    | stop                            |
//! | Empty     | yes    | restore backup, retry           |
//! | Empty     | no     | stop with an empty store        |
//! | Failed    | yes    | restore backup, retry           |
//! | Failed    | no     | stop with an empty store        |
//!
//! The loop is bounded by the configured attempt count, so a backup that is
//! itself empty or corrupted cannot cause endless restores.

use std::path::PathBuf;

/// Classification of one read attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Read succeeded and produced at least one entry
    NonEmpty,
    /// Read succeeded with no entries (missing, zero-byte or `{}` file)
    Empty,
    /// Read failed: not a file, too large, I/O, decrypt or parse error
    Failed,
}

/// What the sync loop does after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Take a first backup of the good file, then stop
    CreateBackup,
    /// Nothing to do, stop
    Done,
    /// Restore the backup over the settings file and read again
    RestoreAndRetry,
    /// No backup to recover from, stop with what was read
    GiveUp,
}

impl RecoveryAction {
    /// Whether the loop stops after this action
    pub fn is_terminal(self) -> bool {
        !matches!(self, RecoveryAction::RestoreAndRetry)
    }
}

/// Transition function of the recovery loop
pub fn next_action(outcome: ReadOutcome, has_backup: bool) -> RecoveryAction {
    match (outcome, has_backup) {
        (ReadOutcome::NonEmpty, false) => RecoveryAction::CreateBackup,
        (ReadOutcome::NonEmpty, true) => RecoveryAction::Done,
        (ReadOutcome::Empty | ReadOutcome::Failed, true) => RecoveryAction::RestoreAndRetry,
        (ReadOutcome::Empty | ReadOutcome::Failed, false) => RecoveryAction::GiveUp,
    }
}

/// Summary of one sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Read attempts made
    pub attempts: usize,
    /// Outcome of the last attempt (`None` if the engine has no path)
    pub outcome: Option<ReadOutcome>,
    /// Backups successfully restored
    pub restores: usize,
    /// Quarantine files written while restoring
    pub quarantined: Vec<PathBuf>,
    /// Whether a first backup was taken of the file read
    pub backup_created: bool,
}

impl SyncReport {
    /// Whether the sync ended with a successful read
    pub fn is_loaded(&self) -> bool {
        matches!(
            self.outcome,
            Some(ReadOutcome::NonEmpty) | Some(ReadOutcome::Empty)
        )
    }
}
