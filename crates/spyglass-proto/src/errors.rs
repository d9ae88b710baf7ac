//! Error types for the Spyglass wire layer.

use thiserror::Error;

/// Errors that can occur while encoding or decoding call envelopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Encoded envelope exceeds the maximum accepted size
    #[error("envelope too large: {size} bytes exceeds maximum {max}")]
    EnvelopeTooLarge {
        /// Actual encoded size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Failed to encode data as CBOR
    #[error("failed to encode CBOR: {0}")]
    CborEncode(String),

    /// Failed to decode CBOR data
    #[error("failed to decode CBOR: {0}")]
    CborDecode(String),
}

/// Convenient Result type alias for wire operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
