//! Encrypted settings files

use std::fs;

use crate::common::*;

#[test]
fn encrypted_file_roundtrips_with_codec() {
    let test = TestSettings::with_config(SettingsConfig::encrypted());

    {
        let mut settings = test.open();
        settings.set("secret/token", "abc123").unwrap();
        settings.flush().unwrap();
    }

    let raw = fs::read(test.path()).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

    let settings = test.open();
    assert_eq!(settings.get_text("secret/token", ""), "abc123");
}

#[test]
fn plaintext_file_is_corrupted_for_encrypted_engine() {
    let plain = TestSettings::new();
    {
        let mut settings = plain.open();
        settings.set("k", 1).unwrap();
    }

    let encrypted = TestSettings {
        dir: plain.dir,
        config: SettingsConfig::encrypted(),
    };
    // The first open took a plaintext backup; remove it so nothing recovers.
    fs::remove_file(encrypted.backup_path()).unwrap();

    let settings = encrypted.open();
    assert!(settings.is_empty());
}
