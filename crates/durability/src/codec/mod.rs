//! Encryption seam for settings files
//!
//! The encryption primitive itself lives outside this crate; the engine only
//! calls [`StorageCodec::encode`] / [`StorageCodec::decode`] around the whole
//! serialized document.

mod identity;
mod traits;

pub use identity::IdentityCodec;
pub use traits::{CodecError, StorageCodec};
