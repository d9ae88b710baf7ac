//! Identity oracle for protocol invocations.
//!
//! The `Environment` trait decouples protocol logic from how the host learns
//! who sent a transaction. A ledger runtime verifies a signature; a test
//! harness simply names a principal. The state machine sees neither.
//!
//! # Invariants
//!
//! - Stability: `sender()` returns the same principal for the whole
//!   invocation
//! - Authenticity: production implementations only return principals whose
//!   signature the host has verified

use spyglass_proto::PrincipalId;

/// Per-invocation context supplied by the host.
///
/// # Implementations
///
/// - `PrincipalId` itself, for hosts that already hold the authenticated
///   sender
/// - `spyglass_harness::SimLedger` transactions, which carry the sender from
///   the decoded envelope
pub trait Environment {
    /// Authenticated sender of the current invocation.
    fn sender(&self) -> PrincipalId;
}

impl Environment for PrincipalId {
    fn sender(&self) -> PrincipalId {
        *self
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn sender(&self) -> PrincipalId {
        (**self).sender()
    }
}
