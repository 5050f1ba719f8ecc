//! Persistence through flush, drop and reopen

use std::fs;

use crate::common::*;

// ============================================================================
// Values survive a reopen
// ============================================================================

#[test]
fn flushed_values_survive_reopen() {
    let test = TestSettings::new();

    {
        let mut settings = test.open();
        settings.set("net/timeout", 30).unwrap();
        settings.set("net/host", "example").unwrap();
        settings.flush().unwrap();
    }

    let settings = test.open();
    assert_eq!(settings.get("net/timeout"), Some(&Value::Integer(30)));
    assert_eq!(
        settings.get("net/host"),
        Some(&Value::Text("example".to_string()))
    );
    assert_eq!(settings.len(), 2);
}

#[test]
fn drop_flushes_pending_changes() {
    let test = TestSettings::new();

    {
        let mut settings = test.open();
        settings.set("ui/theme", "dark").unwrap();
        settings.set("ui/scale", 125).unwrap();
    }

    let settings = test.open();
    assert_eq!(settings.get_text("ui/theme", ""), "dark");
    assert_eq!(settings.get_integer("ui/scale", 0), 125);
}

#[test]
fn written_document_is_nested_and_sorted() {
    let test = TestSettings::new();

    {
        let mut settings = test.open();
        settings.set("net/timeout", 30).unwrap();
        settings.set("net/host", "example").unwrap();
        settings.set("version", 2).unwrap();
        settings.flush().unwrap();
    }

    let text = fs::read_to_string(test.path()).unwrap();
    assert_eq!(
        text,
        "{\n    \"net\": {\n        \"host\": \"example\",\n        \"timeout\": 30\n    },\n    \"version\": 2\n}"
    );
}

#[test]
fn removed_keys_do_not_come_back() {
    let test = TestSettings::new();

    {
        let mut settings = test.open();
        settings.set("a/x", 1).unwrap();
        settings.set("a/y", 2).unwrap();
        settings.flush().unwrap();
    }

    {
        let mut settings = test.open();
        assert_eq!(settings.remove("a/x"), Some(Value::Integer(1)));
        settings.flush().unwrap();
    }

    let settings = test.open();
    assert!(!settings.contains("a/x"));
    assert!(settings.contains("a/y"));
}

// ============================================================================
// Flush idempotence
// ============================================================================

#[test]
fn second_flush_without_changes_does_not_write() {
    let test = TestSettings::new();
    let mut settings = test.open();

    settings.set("k", "v").unwrap();
    settings.flush().unwrap();
    assert!(!settings.is_changed());

    // Any write would replace this marker content.
    fs::write(test.path(), b"{\"marker\": 1}").unwrap();
    settings.flush().unwrap();

    assert_eq!(fs::read(test.path()).unwrap(), b"{\"marker\": 1}");
}

#[test]
fn flush_backs_up_previous_file() {
    let test = TestSettings::new();

    {
        let mut settings = test.open();
        settings.set("generation", 1).unwrap();
        settings.flush().unwrap();
    }

    let first = fs::read(test.path()).unwrap();

    {
        let mut settings = test.open();
        settings.set("generation", 2).unwrap();
        settings.flush().unwrap();
    }

    assert_eq!(fs::read(test.backup_path()).unwrap(), first);
}

// ============================================================================
// Missing file is success
// ============================================================================

#[test]
fn missing_file_yields_empty_store_and_creates_file() {
    let test = TestSettings::new();
    assert!(!test.path().exists());

    let mut settings = test.open();
    assert!(settings.is_empty());
    assert!(test.path().exists());

    let report = settings.sync();
    assert!(report.is_loaded());
    assert_eq!(report.attempts, 1);
    assert_eq!(report.restores, 0);
    assert!(test.quarantine_files().is_empty());
}

#[test]
fn missing_parent_directories_are_created() {
    let test = TestSettings::new();
    let path = test.dir.path().join("nested/deeper/app.json");

    {
        let mut settings = JsonSettings::open_path(&path);
        assert!(settings.is_writable());
        settings.set("k", 1).unwrap();
    }

    assert!(path.exists());
    let settings = JsonSettings::open_path(&path);
    assert_eq!(settings.get_integer("k", 0), 1);
}

#[test]
fn path_extension_is_forced_to_json() {
    let test = TestSettings::new();
    let settings = JsonSettings::open_path(test.dir.path().join("app.ini"));
    assert_eq!(settings.path(), Some(test.path().as_path()));
    assert_eq!(settings.backup_path(), Some(test.backup_path()));
}
