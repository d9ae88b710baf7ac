//! Identifier types.
//!
//! All identifiers are small `Copy` newtypes so they can be passed by value
//! through the state machine without borrowing gymnastics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a recruited agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u64);

impl AgentId {
    /// Wrap a raw agent number.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw agent number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Authenticated identity of a transaction sender.
///
/// The host derives this from a verified signature. The state machine only
/// compares principals for equality and never inspects the bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalId([u8; 32]);

impl PrincipalId {
    /// Length of a principal in bytes.
    pub const LEN: usize = 32;

    /// Create a principal from raw public key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the principal.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell principals apart in logs
        write!(f, "PrincipalId({}..)", hex::encode(&self.0[..8]))
    }
}

/// Pre-agreed value an agent presents with every message.
///
/// `Debug` is redacted so a secret can never leak through a log line or a
/// panic message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedSecret(u64);

impl SharedSecret {
    /// Wrap a raw security code.
    pub const fn new(code: u64) -> Self {
        Self(code)
    }

    /// Raw security code.
    pub const fn expose(self) -> u64 {
        self.0
    }
}

impl From<u64> for SharedSecret {
    fn from(code: u64) -> Self {
        Self(code)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}
