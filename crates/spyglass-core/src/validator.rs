//! Message validation pipeline.
//!
//! Validation is pure: it takes the submitted message and the stored record
//! of its agent and either returns the record to persist or the first rule
//! the message breaks. It never touches storage, which keeps it trivially
//! deterministic and cheap to property-test.
//!
//! # Pipeline
//!
//! 1. **Existence**: the agent has been recruited
//! 2. **Secret**: the presented security code matches the stored one
//! 3. **Length**: the payload has exactly twelve digits
//! 4. **Ordering**: the sequence number is above the last accepted one
//!
//! The first failing step decides the rejection reason.

use spyglass_proto::SpyMessage;

use crate::{ProtocolConfig, Rejection, state::AgentRecord};

/// Validates agent messages against stored agent records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageValidator {
    min_payload: u64,
    max_payload: u64,
}

impl MessageValidator {
    /// Create a validator from an already validated configuration.
    pub fn new(config: &ProtocolConfig) -> Self {
        debug_assert!(config.min_payload <= config.max_payload);
        Self { min_payload: config.min_payload, max_payload: config.max_payload }
    }

    /// Run the full pipeline.
    ///
    /// `stored` is the agent's current record, or `None` if the agent has
    /// never been recruited. On success, returns the record with the
    /// message's sequence number as the last accepted one.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` of the first failing step.
    pub fn validate(
        &self,
        message: &SpyMessage,
        stored: Option<&AgentRecord>,
    ) -> Result<AgentRecord, Rejection> {
        let record = stored.ok_or(Rejection::AgentNotRegistered)?;

        if message.security_code != record.security_code {
            return Err(Rejection::SecretMismatch);
        }

        self.check_payload(message.payload)?;

        if message.sequence_number <= record.last_sequence_number {
            return Err(Rejection::StaleOrDuplicateSequenceNumber);
        }

        let updated = record.advanced_to(message.sequence_number);

        debug_assert!(updated.last_sequence_number > record.last_sequence_number);
        debug_assert_eq!(updated.security_code, record.security_code);

        Ok(updated)
    }

    /// Check that a payload lies within the configured bounds.
    ///
    /// # Errors
    ///
    /// - `Rejection::MessageTooShort` below the minimum
    /// - `Rejection::MessageTooLong` above the maximum
    pub fn check_payload(&self, payload: u64) -> Result<(), Rejection> {
        if payload < self.min_payload {
            return Err(Rejection::MessageTooShort);
        }
        if payload > self.max_payload {
            return Err(Rejection::MessageTooLong);
        }
        Ok(())
    }
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::new(&ProtocolConfig::default())
    }
}
