//! Settings Integration Tests
//!
//! End-to-end behavior of the settings engine against real files:
//! - Values survive a flush and reopen
//! - Corrupted, emptied and oversized files are recovered from the backup
//! - Documents round-trip through the flat store
//! - Encrypted files are unreadable without the codec

#[path = "../common/mod.rs"]
mod common;

mod encryption;
mod end_to_end;
mod recovery;
