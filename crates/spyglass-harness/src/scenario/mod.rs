//! Scenario testing framework for deterministic ledger tests.
//!
//! This module provides a declarative API for writing scenario-based tests
//! that follow the Oracle Pattern. A scenario lists transactions and block
//! boundaries, runs them against a fresh [`crate::SimLedger`], and hands the
//! resulting world to a mandatory oracle.

mod builder;
pub mod oracle;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use oracle::OracleFn;
pub use world::World;
