//! Storage codec trait definitions.

/// Storage codec trait.
///
/// Every settings byte buffer read from or written to disk passes through the
/// codec when encryption is enabled. The codec transforms the whole serialized
/// document, never individual fields.
///
/// # Codec Identity
///
/// Each codec has an identifier that is carried in errors so a wrong-codec
/// failure can be told apart from data corruption.
pub trait StorageCodec: Send + Sync {
    /// Encode bytes for storage.
    ///
    /// The returned bytes are what gets written to disk.
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decode bytes from storage.
    ///
    /// Reverses the encode operation. Returns an error if the data
    /// cannot be decoded (e.g., decryption failure, corruption).
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Unique codec identifier.
    fn codec_id(&self) -> &str;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Encoding failed (e.g., missing key material).
    #[error("Encode error (codec={codec_id}): {detail}")]
    EncodeError {
        /// Human-readable error description
        detail: String,
        /// Codec ID that attempted the encode
        codec_id: String,
    },

    /// Decoding failed (e.g., decryption failure, invalid format).
    ///
    /// Carries the codec identity and data length so callers can
    /// distinguish a wrong-codec error from data corruption.
    #[error("Decode error (codec={codec_id}, data_len={data_len}): {detail}")]
    DecodeError {
        /// Human-readable error description
        detail: String,
        /// Codec ID that attempted the decode
        codec_id: String,
        /// Length of the data that failed to decode
        data_len: usize,
    },
}

impl CodecError {
    /// Create an encode error.
    pub fn encode(detail: impl Into<String>, codec_id: impl Into<String>) -> Self {
        CodecError::EncodeError {
            detail: detail.into(),
            codec_id: codec_id.into(),
        }
    }

    /// Create a decode error with full diagnostic context.
    pub fn decode(detail: impl Into<String>, codec_id: impl Into<String>, data_len: usize) -> Self {
        CodecError::DecodeError {
            detail: detail.into(),
            codec_id: codec_id.into(),
            data_len,
        }
    }
}
