//! Shared test utilities for the integration suite.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use chrono::NaiveDate;
pub use strata_settings::{
    export_document, parse_document, CodecError, FixedClock, FlatStore, JsonSettings, KeyPath,
    ReadOutcome, SettingsConfig, StorageCodec, Value, MAX_FILE_SIZE, SYNC_ATTEMPTS,
};
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Install an env-filtered subscriber once so `RUST_LOG` shows recovery diagnostics.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Fixed quarantine timestamp used by [`TestSettings`]: 2025-06-01 08:09:10.011
pub fn fixed_clock() -> FixedClock {
    let at = NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_milli_opt(8, 9, 10, 11))
        .expect("valid timestamp");
    FixedClock(at)
}

/// Quarantine file name produced with [`fixed_clock`] for `app.json`
pub const QUARANTINE_NAME: &str = "app.currupted-20250601-080910-011";

/// Reversible byte transform standing in for a real cipher
pub struct XorCodec(pub u8);

impl StorageCodec for XorCodec {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.iter().map(|b| b ^ self.0).collect())
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.iter().map(|b| b ^ self.0).collect())
    }

    fn codec_id(&self) -> &str {
        "xor"
    }
}

/// Temporary directory holding one settings file, `app.json`
pub struct TestSettings {
    pub dir: TempDir,
    pub config: SettingsConfig,
}

impl TestSettings {
    pub fn new() -> Self {
        Self::with_config(SettingsConfig::default())
    }

    pub fn with_config(config: SettingsConfig) -> Self {
        init_tracing();
        TestSettings {
            dir: TempDir::new().expect("tempdir"),
            config,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("app.json")
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.path().join("app.backup")
    }

    pub fn quarantine_path(&self) -> PathBuf {
        self.dir.path().join(QUARANTINE_NAME)
    }

    /// Open a fresh engine on `app.json`
    pub fn open(&self) -> JsonSettings {
        let builder = JsonSettings::builder()
            .config(self.config.clone())
            .clock(Box::new(fixed_clock()));
        if self.config.encrypted {
            builder.codec(Box::new(XorCodec(0x7f))).open_path(self.path())
        } else {
            builder.open_path(self.path())
        }
    }

    pub fn write_settings(&self, bytes: &[u8]) {
        fs::write(self.path(), bytes).expect("write settings");
    }

    pub fn write_backup(&self, bytes: &[u8]) {
        fs::write(self.backup_path(), bytes).expect("write backup");
    }

    /// Files in the directory whose name contains the quarantine prefix
    pub fn quarantine_files(&self) -> Vec<PathBuf> {
        list_files(self.dir.path())
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().contains("currupted-"))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Sorted list of regular files directly under `dir`
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Build a flat store from `(key, value)` pairs
pub fn store_of(entries: &[(&str, Value)]) -> FlatStore {
    entries
        .iter()
        .map(|(k, v)| (KeyPath::parse(k).expect("valid key"), v.clone()))
        .collect()
}
