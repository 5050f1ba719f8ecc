//! Conversion between nested settings documents and the flat store
//!
//! - `import`: parsed JSON object -> [`FlatStore`](strata_settings_core::FlatStore)
//! - `export`: flat store -> pretty-printed JSON bytes, single forward pass
//! - `writer`: event-driven JSON writer used by the exporter

pub mod export;
pub mod import;
pub mod writer;

pub use export::{export_document, export_value};
pub use import::{import_document, parse_document};
pub use writer::DocumentWriter;
