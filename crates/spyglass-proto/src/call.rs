//! CBOR-encoded call envelopes.
//!
//! A [`Call`] names one of the three state transitions the protocol exposes.
//! An [`Envelope`] pairs a call with the sender the host authenticated, and
//! is the unit a ledger host stores in its mempool.
//!
//! # Security
//!
//! - **Bounded Deserialization**: [`Envelope::decode`] checks the input
//!   against [`Envelope::MAX_ENCODED_SIZE`] before CBOR parsing begins.
//!
//! - **Explicit Schema**: Every call variant has a fixed set of typed fields.
//!   Unknown variants fail to decode.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::{
    AgentId, PrincipalId, SharedSecret, SpyMessage,
    errors::{ProtocolError, Result},
};

/// One of the three state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    /// Claim the spy master role for the sender
    AssignAuthority,

    /// Recruit (or re-recruit) an agent with a shared secret
    RegisterAgent {
        /// Agent being recruited
        agent_id: AgentId,
        /// Secret the agent must present with every message
        security_code: SharedSecret,
    },

    /// Deliver a numbered message from an agent
    SubmitMessage(SpyMessage),
}

impl Call {
    /// Short name of the call, for logs and receipts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssignAuthority => "assign_authority",
            Self::RegisterAgent { .. } => "register_agent",
            Self::SubmitMessage(_) => "submit_message",
        }
    }
}

/// A call together with its authenticated sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender identity, as established by the host's signature check
    pub sender: PrincipalId,
    /// Requested transition
    pub call: Call,
}

impl Envelope {
    /// Maximum accepted encoded size in bytes.
    ///
    /// The largest legitimate envelope is well under 200 bytes.
    pub const MAX_ENCODED_SIZE: usize = 1024;

    /// Create an envelope.
    pub fn new(sender: PrincipalId, call: Call) -> Self {
        Self { sender, call }
    }

    /// Encode the envelope as CBOR into `dst`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::CborEncode` if serialization fails.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        let mut writer = dst.writer();
        ciborium::ser::into_writer(self, &mut writer)
            .map_err(|e| ProtocolError::CborEncode(e.to_string()))
    }

    /// Encode the envelope into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::CborEncode` if serialization fails.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode an envelope from CBOR bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EnvelopeTooLarge` if `bytes` exceeds
    ///   [`Self::MAX_ENCODED_SIZE`]
    /// - `ProtocolError::CborDecode` if the bytes are not a valid envelope
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > Self::MAX_ENCODED_SIZE {
            return Err(ProtocolError::EnvelopeTooLarge {
                size: bytes.len(),
                max: Self::MAX_ENCODED_SIZE,
            });
        }

        ciborium::de::from_reader(bytes).map_err(|e| ProtocolError::CborDecode(e.to_string()))
    }
}
