//! Protocol configuration.

use spyglass_proto::{MAX_PAYLOAD, MIN_PAYLOAD};
use thiserror::Error;

/// Configuration for [`crate::MessageProtocol`].
///
/// The defaults encode the twelve-digit message format. Changing them changes
/// which messages are accepted, so every node of a ledger must agree on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Smallest accepted payload (inclusive)
    pub min_payload: u64,

    /// Largest accepted payload (inclusive)
    pub max_payload: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self { min_payload: MIN_PAYLOAD, max_payload: MAX_PAYLOAD }
    }
}

impl ProtocolConfig {
    /// Check that the configuration describes a non-empty payload range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvertedPayloadBounds` if `min_payload` is
    /// greater than `max_payload`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_payload > self.max_payload {
            return Err(ConfigError::InvertedPayloadBounds {
                min: self.min_payload,
                max: self.max_payload,
            });
        }
        Ok(())
    }
}

/// Invalid protocol configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No payload could ever be accepted
    #[error("payload bounds inverted: min {min} exceeds max {max}")]
    InvertedPayloadBounds {
        /// Configured minimum
        min: u64,
        /// Configured maximum
        max: u64,
    },
}
