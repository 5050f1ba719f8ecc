//! Streaming pretty JSON writer
//!
//! Emits a nested document event by event (`start_object`, `key`, `value`,
//! `end_object`) without building an intermediate tree. Layout and escaping
//! come from `serde_json`'s [`PrettyFormatter`]; this type only tracks nesting
//! so that an unbalanced sequence is detected and reported.

use std::io;

use serde_json::ser::{Formatter, PrettyFormatter};
use strata_settings_core::Value;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, Copy, Default)]
struct Level {
    members: usize,
    awaiting_value: bool,
}

/// Event-driven writer for a single JSON object document
pub struct DocumentWriter {
    out: Vec<u8>,
    formatter: PrettyFormatter<'static>,
    levels: Vec<Level>,
    started: bool,
    complete: bool,
}

impl DocumentWriter {
    /// Create a writer with an empty output buffer
    pub fn new() -> Self {
        DocumentWriter {
            out: Vec::new(),
            formatter: PrettyFormatter::with_indent(INDENT),
            levels: Vec::new(),
            started: false,
            complete: false,
        }
    }

    /// Open an object: the root when nothing has been written, otherwise the
    /// value of the pending key
    pub fn start_object(&mut self) -> io::Result<()> {
        match self.levels.last() {
            None if self.started => return Err(invalid("document already has a root")),
            None => self.started = true,
            Some(level) if !level.awaiting_value => {
                return Err(invalid("object value without a key"));
            }
            Some(_) => self.formatter.begin_object_value(&mut self.out)?,
        }

        self.formatter.begin_object(&mut self.out)?;
        self.levels.push(Level::default());
        Ok(())
    }

    /// Close the innermost open object
    pub fn end_object(&mut self) -> io::Result<()> {
        match self.levels.last() {
            None => return Err(invalid("no open object")),
            Some(level) if level.awaiting_value => {
                return Err(invalid("key without a value"));
            }
            Some(_) => {}
        }

        self.levels.pop();
        self.formatter.end_object(&mut self.out)?;

        match self.levels.last_mut() {
            None => self.complete = true,
            Some(parent) => {
                parent.awaiting_value = false;
                self.formatter.end_object_value(&mut self.out)?;
            }
        }
        Ok(())
    }

    /// Write a member key in the innermost open object
    pub fn key(&mut self, name: &str) -> io::Result<()> {
        let level = match self.levels.last_mut() {
            Some(level) if !level.awaiting_value => level,
            Some(_) => return Err(invalid("consecutive keys")),
            None => return Err(invalid("key outside an object")),
        };

        let first = level.members == 0;
        level.members += 1;
        level.awaiting_value = true;

        self.formatter.begin_object_key(&mut self.out, first)?;
        serde_json::to_writer(&mut self.out, name).map_err(io::Error::from)?;
        self.formatter.end_object_key(&mut self.out)
    }

    /// Write a scalar value for the pending key
    pub fn value(&mut self, value: &Value) -> io::Result<()> {
        match self.levels.last_mut() {
            Some(level) if level.awaiting_value => level.awaiting_value = false,
            _ => return Err(invalid("value without a key")),
        }

        self.formatter.begin_object_value(&mut self.out)?;
        match value {
            Value::Text(s) => serde_json::to_writer(&mut self.out, s).map_err(io::Error::from)?,
            Value::Integer(n) => self.formatter.write_i64(&mut self.out, *n)?,
        }
        self.formatter.end_object_value(&mut self.out)
    }

    /// Current nesting depth (0 before the root is opened and after it closes)
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Whether the root object has been opened and closed
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Take the serialized bytes if the document is complete
    pub fn finish(self) -> Option<Vec<u8>> {
        if self.complete {
            Some(self.out)
        } else {
            None
        }
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        DocumentWriter::new()
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.to_string())
}
