//! Durable per-agent state.

use spyglass_proto::{INITIAL_SEQUENCE_NUMBER, SharedSecret};

/// What the directory stores for each recruited agent.
///
/// # Invariants
///
/// - `last_sequence_number` never decreases; every accepted message strictly
///   increases it
/// - A record is created only by recruitment and never deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRecord {
    /// Secret the agent must present with every message
    pub security_code: SharedSecret,

    /// Sequence number of the last accepted message
    pub last_sequence_number: u64,
}

impl AgentRecord {
    /// Record for a freshly recruited agent.
    pub fn recruited(security_code: SharedSecret) -> Self {
        Self { security_code, last_sequence_number: INITIAL_SEQUENCE_NUMBER }
    }

    /// Same record with `sequence_number` as the last accepted message.
    pub(crate) fn advanced_to(self, sequence_number: u64) -> Self {
        debug_assert!(sequence_number > self.last_sequence_number);
        Self { last_sequence_number: sequence_number, ..self }
    }
}
