//! Settings file I/O
//!
//! Reading: missing file -> empty store (and an empty document is written),
//! zero-byte file -> empty store, oversized file -> rejected unread, otherwise
//! read -> decode (if a codec is given) -> parse -> flatten.
//!
//! Writing uses the write-fsync-rename pattern:
//! 1. Create parent directories
//! 2. Write the encoded document to a temporary file in the same directory
//! 3. fsync the temporary file
//! 4. Rename it over the settings path
//!
//! The temporary file is removed on every failure path.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use strata_settings_core::{FlatStore, SettingsError, SettingsResult};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::codec::StorageCodec;
use crate::document::{export_document, parse_document};

/// Read and flatten a settings file
///
/// `codec` is applied to the whole file when present. Errors are read-side
/// [`SettingsError`] variants; the caller decides how to recover.
pub fn read_settings_file(
    path: &Path,
    codec: Option<&dyn StorageCodec>,
    max_file_size: u64,
) -> SettingsResult<FlatStore> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(target: "strata::settings", path = %path.display(), "Settings file missing, creating an empty one");
            let empty = FlatStore::new();
            if let Err(e) = write_settings_file(path, &empty, codec) {
                warn!(target: "strata::settings", path = %path.display(), error = %e, "Failed to create empty settings file");
            }
            return Ok(empty);
        }
        Err(source) => {
            return Err(SettingsError::ReadIo {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !metadata.is_file() {
        error!(target: "strata::settings", path = %path.display(), "Settings path is not a file");
        return Err(SettingsError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size == 0 {
        return Ok(FlatStore::new());
    }

    if size > max_file_size {
        error!(target: "strata::settings", path = %path.display(), size, max = max_file_size, "Settings file too large");
        return Err(SettingsError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: max_file_size,
        });
    }

    let mut buffer = fs::read(path).map_err(|source| {
        error!(target: "strata::settings", path = %path.display(), error = %source, "Failed to read settings file");
        SettingsError::ReadIo {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Some(codec) = codec {
        buffer = codec.decode(&buffer).map_err(|e| {
            error!(target: "strata::settings", path = %path.display(), error = %e, "Failed to decrypt settings file");
            SettingsError::DecryptFailure {
                path: path.to_path_buf(),
                detail: e.to_string(),
            }
        })?;
    }

    parse_document(&buffer, path).map_err(|e| {
        error!(target: "strata::settings", path = %path.display(), error = %e, "Settings file is damaged");
        e
    })
}

/// Serialize the store and atomically replace the settings file
pub fn write_settings_file(
    path: &Path,
    store: &FlatStore,
    codec: Option<&dyn StorageCodec>,
) -> SettingsResult<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|source| {
        warn!(target: "strata::settings", dir = %dir.display(), error = %source, "Failed to create settings directory");
        SettingsError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        }
    })?;

    let mut buffer = export_document(store)?;

    if let Some(codec) = codec {
        buffer = codec.encode(&buffer).map_err(|e| {
            error!(target: "strata::settings", error = %e, "Failed to encrypt settings");
            SettingsError::EncryptFailure {
                detail: e.to_string(),
            }
        })?;
    }

    write_atomic(dir, path, &buffer).map_err(|source| {
        error!(target: "strata::settings", path = %path.display(), error = %source, "Failed to write settings file");
        SettingsError::WriteIo {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Probe whether the settings file can be written
///
/// An existing file is opened for writing without truncation. Otherwise the
/// parent directories are created and a scoped temporary file is created next
/// to the settings path; it is removed again when the probe returns.
pub fn is_writable(path: &Path) -> bool {
    if path.exists() {
        return OpenOptions::new().write(true).open(path).is_ok();
    }

    let dir = parent_dir(path);
    if fs::create_dir_all(dir).is_err() {
        return false;
    }

    NamedTempFile::new_in(dir).is_ok()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
