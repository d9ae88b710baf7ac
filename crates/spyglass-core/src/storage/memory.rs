use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use spyglass_proto::{AgentId, PrincipalId};

use super::{Storage, StorageError};
use crate::state::AgentRecord;

/// In-memory storage implementation for testing and simulation
///
/// All state is wrapped in Arc<Mutex<>> to allow Clone and shared access
/// between a simulated host and the tests observing it.
///
/// # Thread Safety
///
/// This implementation is thread-safe through Mutex. However, it uses
/// `lock().expect()` which will panic if the mutex is poisoned (a thread
/// panicked while holding the lock). This is acceptable for test code.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Default)]
struct MemoryStorageInner {
    authority: Option<PrincipalId>,

    /// Ordered so snapshots compare and print deterministically
    agents: BTreeMap<AgentId, AgentRecord>,
}

/// Point-in-time copy of everything a `MemoryStorage` holds.
///
/// Compare two snapshots to prove an invocation left state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Authority at snapshot time
    pub authority: Option<PrincipalId>,
    /// Agent directory at snapshot time
    pub agents: BTreeMap<AgentId, AgentRecord>,
}

impl MemoryStorage {
    /// Create a new empty MemoryStorage
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryStorageInner::default())) }
    }

    /// Get the number of recruited agents
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    pub fn agent_count(&self) -> usize {
        self.inner.lock().expect("MemoryStorage mutex poisoned").agents.len()
    }

    /// Copy the full state
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test/simulation code.
    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.inner.lock().expect("MemoryStorage mutex poisoned");
        StateSnapshot { authority: inner.authority, agents: inner.agents.clone() }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    fn load_authority(&self) -> Result<Option<PrincipalId>, StorageError> {
        Ok(self.inner.lock().expect("MemoryStorage mutex poisoned").authority)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    fn store_authority(&self, authority: PrincipalId) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("MemoryStorage mutex poisoned");

        if let Some(existing) = inner.authority {
            return Err(StorageError::AuthorityAlreadySet { existing });
        }

        inner.authority = Some(authority);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    fn load_agent(&self, agent_id: AgentId) -> Result<Option<AgentRecord>, StorageError> {
        Ok(self.inner.lock().expect("MemoryStorage mutex poisoned").agents.get(&agent_id).copied())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    fn store_agent(&self, agent_id: AgentId, record: &AgentRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("MemoryStorage mutex poisoned");

        inner.agents.insert(agent_id, *record);

        Ok(())
    }
}
