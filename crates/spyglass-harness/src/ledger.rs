//! Simulated ledger host.
//!
//! `SimLedger` plays the role of the execution layer the protocol core is
//! embedded in. It is deliberately minimal: no signatures, no consensus, one
//! store. What it does reproduce faithfully is the invocation contract:
//!
//! - Transactions are executed one at a time, in submission order
//! - Each transaction is decoded, dispatched and, if accepted, applied before
//!   the next one starts
//! - Every transaction yields a [`Receipt`] with a boolean status and, on
//!   failure, the reason string

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use spyglass_core::{
    AgentRecord, ConfigError, InvocationError, MessageProtocol, ProtocolConfig, Rejection,
    storage::MemoryStorage,
};
use spyglass_proto::{AgentId, Call, Envelope, PrincipalId, ProtocolError};

/// Configuration for a [`SimLedger`].
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Maximum number of transactions sealed into one block
    pub max_transactions_per_block: usize,

    /// Configuration of the hosted protocol
    pub protocol: ProtocolConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { max_transactions_per_block: 64, protocol: ProtocolConfig::default() }
    }
}

/// Outcome of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Sender named in the envelope, if it could be decoded
    pub sender: Option<PrincipalId>,

    /// Name of the dispatched call, if the envelope could be decoded
    pub call: Option<&'static str>,

    /// Whether the transaction was accepted and applied
    pub status: bool,

    /// Reason string on failure
    pub status_message: Option<String>,

    /// Typed rejection, when the failure was a protocol rejection
    pub rejection: Option<Rejection>,
}

impl Receipt {
    fn accepted(envelope: &Envelope) -> Self {
        Self {
            sender: Some(envelope.sender),
            call: Some(envelope.call.name()),
            status: true,
            status_message: None,
            rejection: None,
        }
    }

    fn failed(envelope: &Envelope, err: &InvocationError) -> Self {
        Self {
            sender: Some(envelope.sender),
            call: Some(envelope.call.name()),
            status: false,
            status_message: Some(err.to_string()),
            rejection: err.rejection(),
        }
    }

    fn undecodable(err: &ProtocolError) -> Self {
        Self {
            sender: None,
            call: None,
            status: false,
            status_message: Some(err.to_string()),
            rejection: None,
        }
    }
}

/// A sealed batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Height, starting at 1
    pub height: u64,

    /// One receipt per transaction, in execution order
    pub receipts: Vec<Receipt>,
}

/// In-memory ledger hosting one `MessageProtocol`.
pub struct SimLedger {
    config: LedgerConfig,
    protocol: MessageProtocol,
    storage: MemoryStorage,
    mempool: VecDeque<Bytes>,
    blocks: Vec<Block>,
}

impl SimLedger {
    /// Create a ledger with default configuration.
    pub fn new() -> Self {
        Self {
            config: LedgerConfig::default(),
            protocol: MessageProtocol::new(),
            storage: MemoryStorage::new(),
            mempool: VecDeque::new(),
            blocks: Vec::new(),
        }
    }

    /// Create a ledger with a custom configuration.
    ///
    /// A block size of zero is raised to one so the mempool always drains.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the protocol configuration is invalid.
    pub fn with_config(mut config: LedgerConfig) -> Result<Self, ConfigError> {
        let protocol = MessageProtocol::with_config(config.protocol)?;
        config.max_transactions_per_block = config.max_transactions_per_block.max(1);

        Ok(Self { config, protocol, ..Self::new() })
    }

    /// Queue a call from `sender`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the envelope cannot be encoded.
    pub fn submit(&mut self, sender: PrincipalId, call: Call) -> Result<(), ProtocolError> {
        let mut buf = BytesMut::new();
        Envelope::new(sender, call).encode(&mut buf)?;
        self.mempool.push_back(buf.freeze());
        Ok(())
    }

    /// Queue raw bytes as a transaction, bypassing encoding.
    pub fn submit_raw(&mut self, bytes: impl Into<Bytes>) {
        self.mempool.push_back(bytes.into());
    }

    /// Number of queued transactions.
    pub fn pending(&self) -> usize {
        self.mempool.len()
    }

    /// Execute up to `max_transactions_per_block` queued transactions and
    /// seal them into a block.
    ///
    /// An empty mempool produces an empty block.
    pub fn produce_block(&mut self) -> &Block {
        let count = self.mempool.len().min(self.config.max_transactions_per_block);
        let receipts: Vec<Receipt> = self
            .mempool
            .drain(..count)
            .collect::<Vec<_>>()
            .iter()
            .map(|bytes| self.execute(bytes))
            .collect();

        let height = self.blocks.len() as u64 + 1;
        let accepted = receipts.iter().filter(|r| r.status).count();
        tracing::info!(
            height,
            transactions = receipts.len(),
            accepted,
            pending = self.mempool.len(),
            "Produced block"
        );

        self.blocks.push(Block { height, receipts });
        &self.blocks[self.blocks.len() - 1]
    }

    /// All blocks produced so far.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Receipts of every block, in execution order.
    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.blocks.iter().flat_map(|block| block.receipts.iter())
    }

    /// Current spy master.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError::Storage` if the store cannot be read.
    pub fn authority(&self) -> Result<Option<PrincipalId>, InvocationError> {
        self.protocol.authority(&self.storage)
    }

    /// Current record of an agent.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError::Storage` if the store cannot be read.
    pub fn agent(&self, agent_id: AgentId) -> Result<Option<AgentRecord>, InvocationError> {
        self.protocol.agent(agent_id, &self.storage)
    }

    /// Backing store, for snapshots and direct inspection.
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    fn execute(&self, bytes: &[u8]) -> Receipt {
        let envelope = match Envelope::decode(bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, size = bytes.len(), "Dropping undecodable transaction");
                return Receipt::undecodable(&e);
            },
        };

        let applied = self
            .protocol
            .dispatch(&envelope.sender, &envelope.call, &self.storage)
            .and_then(|actions| {
                debug_assert!(actions.len() <= 1);
                for action in &actions {
                    action.apply(&self.storage)?;
                }
                Ok(())
            });

        match applied {
            Ok(()) => Receipt::accepted(&envelope),
            Err(e) => Receipt::failed(&envelope, &e),
        }
    }
}

impl Default for SimLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use spyglass_core::storage::Storage;
    use spyglass_proto::{SharedSecret, SpyMessage};

    use super::*;

    const MASTER: PrincipalId = PrincipalId::from_bytes([1; 32]);

    #[test]
    fn empty_mempool_produces_empty_block() {
        let mut ledger = SimLedger::new();

        let block = ledger.produce_block();
        assert_eq!(block.height, 1);
        assert!(block.receipts.is_empty());
    }

    #[test]
    fn heights_increase() {
        let mut ledger = SimLedger::new();

        ledger.produce_block();
        ledger.produce_block();
        let block = ledger.produce_block();

        assert_eq!(block.height, 3);
        assert_eq!(ledger.blocks().len(), 3);
    }

    #[test]
    fn accepted_transaction_is_applied() {
        let mut ledger = SimLedger::new();
        ledger.submit(MASTER, Call::AssignAuthority).expect("submit failed");
        assert_eq!(ledger.pending(), 1);

        let block = ledger.produce_block();
        assert_eq!(
            block.receipts,
            vec![Receipt {
                sender: Some(MASTER),
                call: Some("assign_authority"),
                status: true,
                status_message: None,
                rejection: None,
            }]
        );

        assert_eq!(ledger.pending(), 0);
        assert_eq!(ledger.authority().expect("query failed"), Some(MASTER));
    }

    #[test]
    fn transactions_in_one_block_see_earlier_writes() {
        let mut ledger = SimLedger::new();
        ledger.submit(MASTER, Call::AssignAuthority).expect("submit failed");
        ledger
            .submit(
                MASTER,
                Call::RegisterAgent {
                    agent_id: AgentId::new(7),
                    security_code: SharedSecret::new(69420),
                },
            )
            .expect("submit failed");
        ledger
            .submit(
                MASTER,
                Call::SubmitMessage(SpyMessage::new(7, 1, 123_456_789_012, 69420)),
            )
            .expect("submit failed");

        let block = ledger.produce_block();
        assert!(block.receipts.iter().all(|r| r.status));

        let record = ledger.agent(AgentId::new(7)).expect("query failed").expect("missing");
        assert_eq!(record.last_sequence_number, 1);
    }

    #[test]
    fn rejected_transaction_reports_reason() {
        let mut ledger = SimLedger::new();
        ledger
            .submit(
                MASTER,
                Call::SubmitMessage(SpyMessage::new(7, 1, 123_456_789_012, 69420)),
            )
            .expect("submit failed");

        let receipt = ledger.produce_block().receipts[0].clone();
        assert!(!receipt.status);
        assert_eq!(receipt.rejection, Some(Rejection::AgentNotRegistered));
        assert_eq!(
            receipt.status_message.as_deref(),
            Some("Spy not recruited yet, no spy with that id has been initialized")
        );
    }

    #[test]
    fn undecodable_transaction_fails_without_state_change() {
        let mut ledger = SimLedger::new();
        let before = ledger.storage().snapshot();

        ledger.submit_raw(vec![0xff, 0xfe, 0xfd]);
        let receipt = ledger.produce_block().receipts[0].clone();

        assert!(!receipt.status);
        assert_eq!(receipt.sender, None);
        assert_eq!(receipt.rejection, None);
        assert!(receipt.status_message.expect("message").contains("failed to decode CBOR"));
        assert_eq!(ledger.storage().snapshot(), before);
    }

    #[test]
    fn block_size_limit_leaves_rest_pending() {
        let config = LedgerConfig { max_transactions_per_block: 2, ..LedgerConfig::default() };
        let mut ledger = SimLedger::with_config(config).expect("valid config");

        for _ in 0..5 {
            ledger.submit(MASTER, Call::AssignAuthority).expect("submit failed");
        }

        assert_eq!(ledger.produce_block().receipts.len(), 2);
        assert_eq!(ledger.pending(), 3);
        assert_eq!(ledger.produce_block().receipts.len(), 2);
        assert_eq!(ledger.produce_block().receipts.len(), 1);
        assert_eq!(ledger.pending(), 0);

        let accepted = ledger.receipts().filter(|r| r.status).count();
        assert_eq!(accepted, 1);
    }

    #[test]
    fn zero_block_size_is_raised() {
        let config = LedgerConfig { max_transactions_per_block: 0, ..LedgerConfig::default() };
        let mut ledger = SimLedger::with_config(config).expect("valid config");

        ledger.submit(MASTER, Call::AssignAuthority).expect("submit failed");
        assert_eq!(ledger.produce_block().receipts.len(), 1);
    }

    #[test]
    fn invalid_protocol_config_rejected() {
        let config = LedgerConfig {
            protocol: ProtocolConfig { min_payload: 5, max_payload: 4 },
            ..LedgerConfig::default()
        };

        assert!(SimLedger::with_config(config).is_err());
    }

    #[test]
    fn storage_is_shared_with_observers() {
        let mut ledger = SimLedger::new();
        let observer = ledger.storage().clone();

        ledger.submit(MASTER, Call::AssignAuthority).expect("submit failed");
        ledger.produce_block();

        assert_eq!(observer.load_authority().expect("load failed"), Some(MASTER));
    }
}
