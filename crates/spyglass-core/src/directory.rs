//! Agent directory: recruitment of agents by the spy master.

use spyglass_proto::{AgentId, PrincipalId, SharedSecret};

use crate::{
    InvocationError, ProtocolAction, authority::AuthorityRegister, state::AgentRecord,
    storage::Storage,
};

/// Rules governing recruitment.
pub struct AgentDirectory;

impl AgentDirectory {
    /// Recruit `agent_id` with `security_code` on behalf of `sender`.
    ///
    /// Recruiting an agent that already exists replaces its record and
    /// resets its sequence counter to zero. Messages the agent sent before
    /// can then be accepted again.
    ///
    /// # Errors
    ///
    /// - `Rejection::NoAuthority` if no spy master exists yet
    /// - `Rejection::NotAuthorized` if the sender is not the spy master
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn register(
        sender: PrincipalId,
        agent_id: AgentId,
        security_code: SharedSecret,
        storage: &impl Storage,
    ) -> Result<ProtocolAction, InvocationError> {
        AuthorityRegister::require(sender, storage)?;

        // TODO: decide whether re-recruitment is key rotation or must be
        // rejected; until then it is allowed and made visible in logs.
        if let Some(previous) = storage.load_agent(agent_id)? {
            tracing::warn!(
                agent_id = %agent_id,
                last_sequence_number = previous.last_sequence_number,
                "Re-recruiting agent resets its sequence counter"
            );
        }

        Ok(ProtocolAction::StoreAgent { agent_id, record: AgentRecord::recruited(security_code) })
    }

    /// Look up a recruited agent.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError::Storage` if the store cannot be read.
    pub fn lookup(
        agent_id: AgentId,
        storage: &impl Storage,
    ) -> Result<Option<AgentRecord>, InvocationError> {
        Ok(storage.load_agent(agent_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rejection, storage::MemoryStorage};

    const MASTER: PrincipalId = PrincipalId::from_bytes([1; 32]);
    const USURPER: PrincipalId = PrincipalId::from_bytes([2; 32]);

    fn storage_with_master() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.store_authority(MASTER).expect("store failed");
        storage
    }

    #[test]
    fn master_recruits_agent() {
        let storage = storage_with_master();

        let action =
            AgentDirectory::register(MASTER, AgentId::new(7), SharedSecret::new(69420), &storage)
                .expect("register failed");

        assert_eq!(
            action,
            ProtocolAction::StoreAgent {
                agent_id: AgentId::new(7),
                record: AgentRecord {
                    security_code: SharedSecret::new(69420),
                    last_sequence_number: 0,
                },
            }
        );
    }

    #[test]
    fn recruit_without_master_rejected() {
        let storage = MemoryStorage::new();

        let result =
            AgentDirectory::register(MASTER, AgentId::new(7), SharedSecret::new(1), &storage);
        assert_eq!(result, Err(Rejection::NoAuthority.into()));
    }

    #[test]
    fn usurper_cannot_recruit() {
        let storage = storage_with_master();

        let result =
            AgentDirectory::register(USURPER, AgentId::new(7), SharedSecret::new(1), &storage);
        assert_eq!(result, Err(Rejection::NotAuthorized.into()));
    }

    #[test]
    fn re_recruit_resets_counter() {
        let storage = storage_with_master();
        let agent = AgentId::new(7);
        storage
            .store_agent(
                agent,
                &AgentRecord { security_code: SharedSecret::new(1), last_sequence_number: 12 },
            )
            .expect("store failed");

        let action = AgentDirectory::register(MASTER, agent, SharedSecret::new(2), &storage)
            .expect("register failed");

        match action {
            ProtocolAction::StoreAgent { record, .. } => {
                assert_eq!(record.last_sequence_number, 0);
                assert_eq!(record.security_code, SharedSecret::new(2));
            },
            other => panic!("expected StoreAgent, got {:?}", other),
        }
    }

    #[test]
    fn lookup_reports_absence() {
        let storage = MemoryStorage::new();
        assert_eq!(AgentDirectory::lookup(AgentId::new(7), &storage).expect("lookup failed"), None);
    }
}
