//! World state for scenario execution.
//!
//! The World owns the simulated ledger a scenario ran against and offers
//! read-only helpers for oracles.

use crate::ledger::{Block, Receipt, SimLedger};

/// World state containing the ledger after all scenario steps.
pub struct World {
    ledger: SimLedger,
}

impl World {
    pub(crate) fn new(ledger: SimLedger) -> Self {
        Self { ledger }
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut SimLedger {
        &mut self.ledger
    }

    /// The simulated ledger.
    pub fn ledger(&self) -> &SimLedger {
        &self.ledger
    }

    /// All produced blocks.
    pub fn blocks(&self) -> &[Block] {
        self.ledger.blocks()
    }

    /// Receipts of every transaction, in execution order.
    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.ledger.receipts()
    }

    /// Receipt of the last executed transaction.
    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.ledger.receipts().last()
    }

    /// Number of accepted transactions.
    pub fn accepted_count(&self) -> usize {
        self.receipts().filter(|r| r.status).count()
    }

    /// Number of rejected or undecodable transactions.
    pub fn rejected_count(&self) -> usize {
        self.receipts().filter(|r| !r.status).count()
    }
}
