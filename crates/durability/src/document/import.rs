//! Tree importer: nested document -> flat store
//!
//! Depth-first traversal with an explicit stack of member iterators, so deeply
//! nested documents do not consume call stack. Each nested object pushes its
//! key as a segment; leaves are inserted at the joined path.
//!
//! Leaf handling:
//! - string -> `Value::Text`
//! - integer that fits in `i64` -> `Value::Integer`
//! - anything else (bool, float, null, array, out-of-range integer) -> dropped
//!   with a warning

use std::path::Path;

use serde_json::map::Iter as MemberIter;
use serde_json::{Map, Value as JsonValue};
use strata_settings_core::{FlatStore, KeyPath, SettingsError, SettingsResult, Value};
use tracing::warn;

/// Parse settings bytes and flatten the document
///
/// Fails with [`SettingsError::Parse`] if the bytes are not well-formed JSON or
/// the root is not an object. `path` is only used for diagnostics.
pub fn parse_document(bytes: &[u8], path: &Path) -> SettingsResult<FlatStore> {
    let document: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    match document {
        JsonValue::Object(root) => Ok(import_document(&root)),
        other => Err(SettingsError::Parse {
            path: path.to_path_buf(),
            detail: format!("root is {}, expected an object", json_kind(&other)),
        }),
    }
}

/// Flatten a parsed document into a new [`FlatStore`]
pub fn import_document(root: &Map<String, JsonValue>) -> FlatStore {
    let mut store = FlatStore::new();
    let mut segments: Vec<&str> = Vec::new();
    let mut stack: Vec<MemberIter<'_>> = vec![root.iter()];

    while let Some(members) = stack.last_mut() {
        let Some((name, value)) = members.next() else {
            stack.pop();
            // The root iterator has no segment of its own.
            if !stack.is_empty() {
                segments.pop();
            }
            continue;
        };

        let leaf = match value {
            JsonValue::Object(object) => {
                segments.push(name);
                stack.push(object.iter());
                continue;
            }
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => {
                    warn!(target: "strata::settings", key = %joined(&segments, name), number = %n, "Dropping non-integer number");
                    continue;
                }
            },
            other => {
                warn!(target: "strata::settings", key = %joined(&segments, name), kind = json_kind(other), "Dropping unsupported value");
                continue;
            }
        };

        match KeyPath::from_segments(segments.iter().copied().chain([name.as_str()])) {
            Ok(path) => {
                store.insert(&path, leaf);
            }
            Err(e) => {
                warn!(target: "strata::settings", key = %joined(&segments, name), error = %e, "Dropping value with unusable key");
            }
        }
    }

    store
}

fn joined(segments: &[&str], name: &str) -> String {
    let mut key = segments.join("/");
    if !key.is_empty() {
        key.push('/');
    }
    key.push_str(name);
    key
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
