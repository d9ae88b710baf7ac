//! Storage abstraction for protocol state.
//!
//! The protocol keeps two pieces of durable state: a singleton authority slot
//! and a directory of agent records keyed by [`AgentId`]. The host owns
//! durability; the core only sees this trait.
//!
//! # Contract
//!
//! - Read-your-writes: a value stored during an invocation is returned by the
//!   next load of the same key
//! - Atomic keys: a single `store_*` call either fully happens or not at all
//! - Write-once authority: `store_authority` fails once a value is present

mod memory;

pub use memory::{MemoryStorage, StateSnapshot};
use spyglass_proto::{AgentId, PrincipalId};
use thiserror::Error;

use crate::state::AgentRecord;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Attempted to overwrite the authority slot
    #[error("authority already set to {existing}")]
    AuthorityAlreadySet {
        /// Principal currently stored
        existing: PrincipalId,
    },

    /// Backing store could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store holding the authority register and agent directory.
pub trait Storage {
    /// Load the current authority, if one has been assigned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store fails.
    fn load_authority(&self) -> Result<Option<PrincipalId>, StorageError>;

    /// Store the authority.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AuthorityAlreadySet` if an authority exists, or
    /// another `StorageError` if the backing store fails.
    fn store_authority(&self, authority: PrincipalId) -> Result<(), StorageError>;

    /// Load the record of an agent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store fails.
    fn load_agent(&self, agent_id: AgentId) -> Result<Option<AgentRecord>, StorageError>;

    /// Insert or overwrite the record of an agent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store fails.
    fn store_agent(&self, agent_id: AgentId, record: &AgentRecord) -> Result<(), StorageError>;
}
