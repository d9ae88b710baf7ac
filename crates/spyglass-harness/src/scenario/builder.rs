//! Scenario builder API.
//!
//! Provides a declarative API for constructing scenario tests that enforce
//! the Oracle Pattern.

use spyglass_proto::{AgentId, Call, PrincipalId, SharedSecret, SpyMessage};

use crate::{
    ledger::{LedgerConfig, SimLedger},
    scenario::{OracleFn, World},
};

/// One scripted step.
#[derive(Debug, Clone)]
enum Step {
    Submit { sender: PrincipalId, call: Call },
    SubmitRaw(Vec<u8>),
    ProduceBlock,
}

/// Scenario builder.
///
/// Queue transactions, mark block boundaries with
/// [`Scenario::produce_block`], and finish with an oracle. Transactions still
/// queued when the script ends are sealed into a final block.
pub struct Scenario {
    config: LedgerConfig,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a new scenario with default configuration.
    pub fn new() -> Self {
        Self { config: LedgerConfig::default(), steps: Vec::new() }
    }

    /// Configure the simulated ledger.
    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue an arbitrary call.
    pub fn call(mut self, sender: PrincipalId, call: Call) -> Self {
        self.steps.push(Step::Submit { sender, call });
        self
    }

    /// Queue an `AssignAuthority` call.
    pub fn assign_authority(self, sender: PrincipalId) -> Self {
        self.call(sender, Call::AssignAuthority)
    }

    /// Queue a `RegisterAgent` call.
    pub fn register_agent(
        self,
        sender: PrincipalId,
        agent_id: impl Into<AgentId>,
        security_code: impl Into<SharedSecret>,
    ) -> Self {
        self.call(
            sender,
            Call::RegisterAgent { agent_id: agent_id.into(), security_code: security_code.into() },
        )
    }

    /// Queue a `SubmitMessage` call.
    pub fn submit_message(self, sender: PrincipalId, message: SpyMessage) -> Self {
        self.call(sender, Call::SubmitMessage(message))
    }

    /// Queue raw bytes as a transaction.
    pub fn submit_raw(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.steps.push(Step::SubmitRaw(bytes.into()));
        self
    }

    /// Seal everything queued so far into a block.
    pub fn produce_block(mut self) -> Self {
        self.steps.push(Step::ProduceBlock);
        self
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - you cannot run a scenario without
    /// verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Execute the scenario.
    ///
    /// 1. Build a fresh ledger from the configuration
    /// 2. Replay every step in order
    /// 3. Seal any transactions still queued
    /// 4. Invoke the oracle on the final world
    pub fn run(self) -> Result<(), String> {
        let ledger = SimLedger::with_config(self.scenario.config.clone())
            .map_err(|e| format!("invalid ledger config: {}", e))?;
        let mut world = World::new(ledger);

        for step in self.scenario.steps {
            Self::execute_step(&mut world, step)?;
        }

        while world.ledger().pending() > 0 {
            world.ledger_mut().produce_block();
        }

        (self.oracle)(&world)?;

        Ok(())
    }

    fn execute_step(world: &mut World, step: Step) -> Result<(), String> {
        let ledger = world.ledger_mut();
        match step {
            Step::Submit { sender, call } => {
                let name = call.name();
                ledger.submit(sender, call).map_err(|e| format!("{} submit failed: {}", name, e))?;
            },
            Step::SubmitRaw(bytes) => ledger.submit_raw(bytes),
            Step::ProduceBlock => {
                ledger.produce_block();
            },
        }
        Ok(())
    }
}
