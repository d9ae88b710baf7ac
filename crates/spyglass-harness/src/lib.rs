//! Deterministic simulation harness for Spyglass protocol testing.
//!
//! This crate stands in for the ledger host the protocol core runs inside:
//! it queues encoded transactions, seals them into blocks, applies accepted
//! state transitions and records a receipt for every transaction. Principals
//! come from a seeded RNG so every run is reproducible.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod keys;
pub mod ledger;
pub mod scenario;

pub use keys::KeyRing;
pub use ledger::{Block, LedgerConfig, Receipt, SimLedger};
