//! Tree exporter: flat store -> nested document
//!
//! # Algorithm
//!
//! One forward pass over the store's entries, which are sorted by canonical
//! key. Entries sharing a key prefix are therefore contiguous, so the nesting
//! can be rebuilt by comparing each key with the previous one only:
//!
//! 1. Split the key into segments
//! 2. Find the common prefix length with the previous key's segments
//! 3. Close the objects the previous key opened below that prefix
//! 4. Open one object per remaining non-leaf segment
//! 5. Write the leaf segment with the scalar value
//!
//! After the last entry, every object still open is closed, then the root.
//! No intermediate tree is built: O(total segments) time, O(max depth) space.
//!
//! A leaf whose key is a strict prefix of another key (`a` and `a/b`) cannot
//! coexist with that subtree in one document; the leaf is dropped with a
//! warning and the subtree is kept.

use serde_json::Value as JsonValue;
use strata_settings_core::{split_segments, FlatStore, SettingsError, SettingsResult};
use tracing::{error, warn};

use super::writer::DocumentWriter;

/// Serialize the store as a pretty-printed nested JSON document
///
/// Fails with [`SettingsError::IncompleteDocument`] if the writer does not end
/// with a complete document; no bytes are produced in that case.
pub fn export_document(store: &FlatStore) -> SettingsResult<Vec<u8>> {
    let mut writer = DocumentWriter::new();
    write_entries(store, &mut writer).map_err(|e| {
        error!(target: "strata::settings", error = %e, "Settings document writer failed");
        SettingsError::IncompleteDocument
    })?;

    writer.finish().ok_or_else(|| {
        error!(target: "strata::settings", "Incomplete settings document");
        SettingsError::IncompleteDocument
    })
}

/// Export the store and parse the result back into a JSON value
pub fn export_value(store: &FlatStore) -> SettingsResult<JsonValue> {
    let bytes = export_document(store)?;
    serde_json::from_slice(&bytes).map_err(|_| SettingsError::IncompleteDocument)
}

fn write_entries(store: &FlatStore, writer: &mut DocumentWriter) -> std::io::Result<()> {
    writer.start_object()?;

    let mut previous: Vec<&str> = Vec::new();

    for (key, value) in store.entries() {
        let segments: Vec<&str> = split_segments(key).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        if store.has_descendants(key) {
            warn!(target: "strata::settings", key, "Dropping value shadowed by nested keys");
            continue;
        }

        let common = common_prefix_len(&previous, &segments);
        let open = previous.len().saturating_sub(1);
        let keep = common.min(open).min(parents.len());

        for _ in keep..open {
            writer.end_object()?;
        }

        for segment in &parents[keep..] {
            writer.key(segment)?;
            writer.start_object()?;
        }

        writer.key(leaf)?;
        writer.value(value)?;

        previous = segments;
    }

    for _ in 0..previous.len().saturating_sub(1) {
        writer.end_object()?;
    }

    writer.end_object()
}

fn common_prefix_len(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
