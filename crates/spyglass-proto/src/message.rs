//! Agent message format.

use serde::{Deserialize, Serialize};

use crate::{AgentId, SharedSecret};

/// Smallest valid payload: the lowest twelve-digit decimal number.
pub const MIN_PAYLOAD: u64 = 100_000_000_000;

/// Largest valid payload: the highest twelve-digit decimal number.
pub const MAX_PAYLOAD: u64 = 999_999_999_999;

/// Sequence number of a freshly recruited agent. The first accepted message
/// must carry a strictly greater number.
pub const INITIAL_SEQUENCE_NUMBER: u64 = 0;

/// A numbered message submitted by an agent.
///
/// The payload stands in for a twelve-character message. Encoding it as a
/// bounded integer keeps the length check pure arithmetic: a value in
/// `MIN_PAYLOAD..=MAX_PAYLOAD` has exactly twelve decimal digits with no
/// leading zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpyMessage {
    /// Agent claiming authorship
    pub agent_id: AgentId,

    /// Per-agent sequence number, strictly increasing across accepted
    /// messages
    pub sequence_number: u64,

    /// Twelve-digit message body
    pub payload: u64,

    /// Shared secret presented as proof of authorship
    pub security_code: SharedSecret,
}

impl SpyMessage {
    /// Create a new message.
    pub fn new(
        agent_id: impl Into<AgentId>,
        sequence_number: u64,
        payload: u64,
        security_code: impl Into<SharedSecret>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            sequence_number,
            payload,
            security_code: security_code.into(),
        }
    }
}
