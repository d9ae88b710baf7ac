//! Oracle functions for scenario verification.
//!
//! Oracle functions run at the end of scenarios to verify global consistency.
//! They receive the final world state and assert invariants.

use spyglass_core::Rejection;
use spyglass_proto::{AgentId, PrincipalId};

use crate::scenario::World;

/// Oracle function type.
///
/// Receives immutable reference to world state and returns:
/// - `Ok(())` if all invariants hold
/// - `Err(message)` if verification fails
pub type OracleFn = Box<dyn FnOnce(&World) -> Result<(), String>>;

/// Create an oracle that verifies every transaction was accepted.
pub fn all_accepted() -> OracleFn {
    Box::new(|world| {
        match world.receipts().enumerate().find(|(_, receipt)| !receipt.status) {
            None => Ok(()),
            Some((index, receipt)) => Err(format!(
                "transaction {} was rejected: {}",
                index,
                receipt.status_message.as_deref().unwrap_or("<no message>")
            )),
        }
    })
}

/// Create an oracle that verifies the last transaction was accepted.
pub fn last_accepted() -> OracleFn {
    Box::new(|world| {
        let receipt = world.last_receipt().ok_or("no transactions were executed")?;
        if receipt.status {
            Ok(())
        } else {
            Err(format!(
                "last transaction was rejected: {}",
                receipt.status_message.as_deref().unwrap_or("<no message>")
            ))
        }
    })
}

/// Create an oracle that verifies the last transaction was rejected for
/// `expected`, with the verbatim reason string.
pub fn last_rejected_with(expected: Rejection) -> OracleFn {
    Box::new(move |world| {
        let receipt = world.last_receipt().ok_or("no transactions were executed")?;

        if receipt.status {
            return Err(format!("last transaction was accepted, expected {:?}", expected));
        }
        if receipt.rejection != Some(expected) {
            return Err(format!("expected {:?}, got {:?}", expected, receipt.rejection));
        }
        if receipt.status_message.as_deref() != Some(expected.reason()) {
            return Err(format!(
                "status message {:?} does not match reason {:?}",
                receipt.status_message,
                expected.reason()
            ));
        }
        Ok(())
    })
}

/// Create an oracle that verifies an agent's last accepted sequence number.
pub fn last_sequence_is(agent_id: AgentId, expected: u64) -> OracleFn {
    Box::new(move |world| {
        let record = world
            .ledger()
            .agent(agent_id)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("agent {} is not recruited", agent_id))?;

        if record.last_sequence_number == expected {
            Ok(())
        } else {
            Err(format!(
                "agent {}: expected last sequence number {}, got {}",
                agent_id, expected, record.last_sequence_number
            ))
        }
    })
}

/// Create an oracle that verifies who the spy master is.
pub fn authority_is(expected: PrincipalId) -> OracleFn {
    Box::new(move |world| match world.ledger().authority().map_err(|e| e.to_string())? {
        Some(authority) if authority == expected => Ok(()),
        other => Err(format!("expected authority {}, got {:?}", expected, other)),
    })
}

/// Combine multiple oracles into one.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| {
        for oracle in oracles {
            oracle(world)?;
        }
        Ok(())
    })
}
