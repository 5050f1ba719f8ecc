//! Backup recovery of damaged settings files
//!
//! Every damaged file is handled the same way: if a backup exists, the file is
//! quarantined, replaced by the backup and read again, at most three times.

use std::fs;

use crate::common::*;

const BACKUP_DOC: &[u8] = b"{\"net\": {\"host\": \"backup\", \"timeout\": 15}}";

fn assert_backup_content(settings: &JsonSettings) {
    assert_eq!(settings.len(), 2);
    assert_eq!(settings.get_text("net/host", ""), "backup");
    assert_eq!(settings.get_integer("net/timeout", 0), 15);
}

// ============================================================================
// Corrupted file with a backup
// ============================================================================

#[test]
fn corrupted_file_is_restored_from_backup() {
    let test = TestSettings::new();
    test.write_settings(b"{\"net\": {\"host\": ");
    test.write_backup(BACKUP_DOC);

    let settings = test.open();
    assert_backup_content(&settings);
    assert!(!settings.is_changed());
}

#[test]
fn corrupted_file_is_quarantined_exactly_once() {
    let test = TestSettings::new();
    let corrupted: &[u8] = b"\x00\x01 not json at all";
    test.write_settings(corrupted);
    test.write_backup(BACKUP_DOC);

    let _settings = test.open();

    let quarantined = test.quarantine_files();
    assert_eq!(quarantined, vec![test.quarantine_path()]);
    assert_eq!(fs::read(&quarantined[0]).unwrap(), corrupted);
    assert_eq!(fs::read(test.path()).unwrap(), BACKUP_DOC);
}

#[test]
fn sync_report_describes_the_restore() {
    let test = TestSettings::new();
    test.write_settings(BACKUP_DOC);

    // First open reads a good file and takes the backup.
    let mut settings = test.open();
    assert!(test.quarantine_files().is_empty());
    fs::write(test.path(), b"[1, 2, 3]").unwrap();

    let report = settings.sync();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.restores, 1);
    assert_eq!(report.quarantined, vec![test.quarantine_path()]);
    assert_eq!(report.outcome, Some(ReadOutcome::NonEmpty));
    assert_backup_content(&settings);
}

#[test]
fn emptied_file_is_restored_from_backup() {
    let test = TestSettings::new();
    test.write_settings(b"{}");
    test.write_backup(BACKUP_DOC);

    let settings = test.open();
    assert_backup_content(&settings);
}

// ============================================================================
// Size ceiling
// ============================================================================

#[test]
fn oversized_file_is_treated_as_corrupted() {
    let test = TestSettings::new();

    let mut huge = b"{\"blob\": \"".to_vec();
    huge.resize(MAX_FILE_SIZE as usize + 16, b'x');
    huge.extend_from_slice(b"\"}");
    test.write_settings(&huge);
    test.write_backup(BACKUP_DOC);

    let settings = test.open();
    assert_backup_content(&settings);
    assert_eq!(test.quarantine_files().len(), 1);
}

#[test]
fn configured_ceiling_applies() {
    let test = TestSettings::with_config(SettingsConfig::default().with_max_file_size(8));
    test.write_settings(b"{\"key\": \"longer than eight bytes\"}");

    let settings = test.open();
    assert!(settings.is_empty());
    // No backup: the oversized file is left alone.
    assert!(test.quarantine_files().is_empty());
    assert!(test.path().exists());
}

// ============================================================================
// Unrecoverable cases
// ============================================================================

#[test]
fn corrupted_file_without_backup_yields_empty_store() {
    let test = TestSettings::new();
    test.write_settings(b"{ broken");

    let mut settings = test.open();
    assert!(settings.is_empty());
    assert!(test.quarantine_files().is_empty());

    let report = settings.sync();
    assert_eq!(report.attempts, 1);
    assert_eq!(report.outcome, Some(ReadOutcome::Failed));
    assert!(!report.is_loaded());
}

#[test]
fn corrupted_backup_stops_after_three_attempts() {
    let test = TestSettings::new();
    test.write_settings(b"garbage");
    test.write_backup(b"also garbage");

    let mut settings = test.open();
    assert!(settings.is_empty());

    let report = settings.sync();
    assert_eq!(report.attempts, SYNC_ATTEMPTS);
    assert_eq!(report.restores, SYNC_ATTEMPTS);
    assert_eq!(report.outcome, Some(ReadOutcome::Failed));
}

#[test]
fn repeated_restores_keep_the_original_corrupted_bytes() {
    let test = TestSettings::new();
    test.write_settings(b"ORIGINAL-CORRUPTED");
    test.write_backup(b"also garbage");

    let mut settings = test.open();

    // Every restore in this sync shares one fixed timestamp.
    assert_eq!(test.quarantine_files(), vec![test.quarantine_path()]);
    assert_eq!(fs::read(test.quarantine_path()).unwrap(), b"ORIGINAL-CORRUPTED");

    let report = settings.sync();
    assert_eq!(report.restores, SYNC_ATTEMPTS);
    assert!(report.quarantined.is_empty());
    assert_eq!(fs::read(test.quarantine_path()).unwrap(), b"ORIGINAL-CORRUPTED");
}

#[test]
fn system_clock_restores_keep_the_original_corrupted_bytes() {
    init_tracing();

    for round in 0..20 {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, b"ORIGINAL-CORRUPTED").unwrap();
        fs::write(dir.path().join("app.backup"), b"also garbage").unwrap();

        let settings = JsonSettings::open_path(&path);
        assert!(settings.is_empty());

        let kept = list_files(dir.path())
            .into_iter()
            .filter(|p| p.to_string_lossy().contains("currupted-"))
            .any(|p| fs::read(p).unwrap() == b"ORIGINAL-CORRUPTED");
        assert!(kept, "original bytes lost in round {}", round);
    }
}

#[test]
fn new_values_after_failed_recovery_can_be_flushed() {
    let test = TestSettings::new();
    test.write_settings(b"garbage");

    {
        let mut settings = test.open();
        settings.set("fresh", "start").unwrap();
        settings.flush().unwrap();
    }

    let settings = test.open();
    assert_eq!(settings.get_text("fresh", ""), "start");
}

// ============================================================================
// First backup
// ============================================================================

#[test]
fn first_good_read_takes_a_backup() {
    let test = TestSettings::new();
    test.write_settings(BACKUP_DOC);
    assert!(!test.backup_path().exists());

    let mut settings = test.open();
    assert!(test.backup_path().exists());
    assert_eq!(fs::read(test.backup_path()).unwrap(), BACKUP_DOC);

    // Backup already present: not taken again.
    let report = settings.sync();
    assert!(!report.backup_created);
}
