//! Message Protocol State Machine
//!
//! `MessageProtocol` is the single entry point a host calls. It exposes the
//! three state transitions, a dispatcher for decoded [`Call`]s, and the two
//! queryable state slots.
//!
//! # Architecture
//!
//! - **Sans-IO**: Operations read through `&impl Storage` and return actions
//!   instead of writing
//! - **All-or-nothing**: A rejected invocation returns `Err` and no actions;
//!   an accepted one returns exactly one action
//! - **Stateless**: The protocol holds only configuration, so one instance
//!   can serve any number of stores
//!
//! # Flow
//!
//! 1. **Load State**: Read the authority and/or agent record from storage
//! 2. **Validate**: Check preconditions in their fixed order
//! 3. **Return Actions**: `StoreAuthority` or `StoreAgent`
//! 4. **Apply**: The host calls [`ProtocolAction::apply`] on accepted actions
//!
//! The host must serialize invocations against one store. Between steps 1
//! and 4 no other invocation may write to it.

use spyglass_proto::{AgentId, Call, PrincipalId, SharedSecret, SpyMessage};

use crate::{
    ConfigError, InvocationError, ProtocolConfig,
    authority::AuthorityRegister,
    directory::AgentDirectory,
    env::Environment,
    state::AgentRecord,
    storage::{Storage, StorageError},
    validator::MessageValidator,
};

/// State mutations returned by an accepted invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolAction {
    /// Fill the authority slot
    StoreAuthority {
        /// New spy master
        authority: PrincipalId,
    },

    /// Insert or overwrite an agent record
    StoreAgent {
        /// Agent being written
        agent_id: AgentId,
        /// Record to persist
        record: AgentRecord,
    },
}

impl ProtocolAction {
    /// Write this action to `storage`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn apply(&self, storage: &impl Storage) -> Result<(), StorageError> {
        match self {
            Self::StoreAuthority { authority } => storage.store_authority(*authority),
            Self::StoreAgent { agent_id, record } => storage.store_agent(*agent_id, record),
        }
    }
}

/// The Spyglass state machine.
#[derive(Debug, Clone, Default)]
pub struct MessageProtocol {
    config: ProtocolConfig,
    validator: MessageValidator,
}

impl MessageProtocol {
    /// Create a protocol with the default twelve-digit message format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a protocol with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn with_config(config: ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, validator: MessageValidator::new(&config) })
    }

    /// Active configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Make the sender the spy master.
    ///
    /// # Invariants
    ///
    /// - **Pre**: The authority slot is empty
    /// - **Post**: Returns exactly one `StoreAuthority` action for the sender
    ///
    /// # Errors
    ///
    /// - `Rejection::OnlyOneAuthority` if a spy master already exists
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn assign_authority(
        &self,
        env: &impl Environment,
        storage: &impl Storage,
    ) -> Result<Vec<ProtocolAction>, InvocationError> {
        let sender = env.sender();
        let result = AuthorityRegister::assign(sender, storage);
        Self::finish("assign_authority", result)
    }

    /// Recruit an agent. Only the spy master may do this.
    ///
    /// # Invariants
    ///
    /// - **Pre**: A spy master exists and is the sender
    /// - **Post**: Returns exactly one `StoreAgent` action with
    ///   `last_sequence_number = 0`
    ///
    /// # Errors
    ///
    /// - `Rejection::NoAuthority` if no spy master exists
    /// - `Rejection::NotAuthorized` if the sender is not the spy master
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn register_agent(
        &self,
        env: &impl Environment,
        agent_id: AgentId,
        security_code: SharedSecret,
        storage: &impl Storage,
    ) -> Result<Vec<ProtocolAction>, InvocationError> {
        let sender = env.sender();
        let result = AgentDirectory::register(sender, agent_id, security_code, storage);
        Self::finish("register_agent", result)
    }

    /// Accept a message from an agent.
    ///
    /// # Invariants
    ///
    /// - **Pre**: The agent is recruited, the code matches, the payload has
    ///   twelve digits and the sequence number is fresh
    /// - **Post**: Returns exactly one `StoreAgent` action whose
    ///   `last_sequence_number` is the message's sequence number
    ///
    /// # Errors
    ///
    /// - `Rejection::AgentNotRegistered`, `SecretMismatch`,
    ///   `MessageTooShort`, `MessageTooLong` or
    ///   `StaleOrDuplicateSequenceNumber`, in that order of precedence
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn submit_message(
        &self,
        message: &SpyMessage,
        storage: &impl Storage,
    ) -> Result<Vec<ProtocolAction>, InvocationError> {
        let result = self.validate_message(message, storage);
        Self::finish("submit_message", result)
    }

    /// Route a decoded call to its operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed operation returns.
    pub fn dispatch(
        &self,
        env: &impl Environment,
        call: &Call,
        storage: &impl Storage,
    ) -> Result<Vec<ProtocolAction>, InvocationError> {
        match call {
            Call::AssignAuthority => self.assign_authority(env, storage),
            Call::RegisterAgent { agent_id, security_code } => {
                self.register_agent(env, *agent_id, *security_code, storage)
            },
            Call::SubmitMessage(message) => self.submit_message(message, storage),
        }
    }

    /// Current spy master.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError::Storage` if the store cannot be read.
    pub fn authority(&self, storage: &impl Storage) -> Result<Option<PrincipalId>, InvocationError> {
        Ok(storage.load_authority()?)
    }

    /// Current record of an agent.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError::Storage` if the store cannot be read.
    pub fn agent(
        &self,
        agent_id: AgentId,
        storage: &impl Storage,
    ) -> Result<Option<AgentRecord>, InvocationError> {
        AgentDirectory::lookup(agent_id, storage)
    }

    fn validate_message(
        &self,
        message: &SpyMessage,
        storage: &impl Storage,
    ) -> Result<ProtocolAction, InvocationError> {
        let agent_id = message.agent_id;
        let stored = storage.load_agent(agent_id)?;
        let record = self.validator.validate(message, stored.as_ref())?;

        Ok(ProtocolAction::StoreAgent { agent_id, record })
    }

    /// Log the outcome and wrap the single action.
    fn finish(
        operation: &'static str,
        result: Result<ProtocolAction, InvocationError>,
    ) -> Result<Vec<ProtocolAction>, InvocationError> {
        match result {
            Ok(action) => {
                match &action {
                    ProtocolAction::StoreAuthority { authority } => {
                        tracing::debug!(operation, authority = %authority, "Accepted");
                    },
                    ProtocolAction::StoreAgent { agent_id, record } => {
                        tracing::debug!(
                            operation,
                            agent_id = %agent_id,
                            sequence_number = record.last_sequence_number,
                            "Accepted"
                        );
                    },
                }
                Ok(vec![action])
            },
            Err(InvocationError::Rejected(rejection)) => {
                tracing::debug!(operation, reason = %rejection, "Rejected");
                Err(rejection.into())
            },
            Err(InvocationError::Storage(e)) => {
                tracing::error!(operation, error = %e, "Storage failure during invocation");
                Err(e.into())
            },
        }
    }
}
