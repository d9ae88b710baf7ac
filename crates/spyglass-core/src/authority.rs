//! Authority register: the single spy master.
//!
//! The register starts empty and is filled exactly once. Nothing in the
//! protocol clears or replaces it, including a second assignment by the
//! current authority.

use spyglass_proto::PrincipalId;

use crate::{InvocationError, ProtocolAction, Rejection, storage::Storage};

/// Rules governing the authority slot.
pub struct AuthorityRegister;

impl AuthorityRegister {
    /// Claim the authority slot for `sender`.
    ///
    /// # Errors
    ///
    /// - `Rejection::OnlyOneAuthority` if an authority is already assigned,
    ///   whoever the sender is
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn assign(
        sender: PrincipalId,
        storage: &impl Storage,
    ) -> Result<ProtocolAction, InvocationError> {
        if storage.load_authority()?.is_some() {
            return Err(Rejection::OnlyOneAuthority.into());
        }

        Ok(ProtocolAction::StoreAuthority { authority: sender })
    }

    /// Require that `sender` is the assigned authority.
    ///
    /// Checks run in order: an authority must exist, then it must be the
    /// sender.
    ///
    /// # Errors
    ///
    /// - `Rejection::NoAuthority` if no authority has been assigned
    /// - `Rejection::NotAuthorized` if the sender is not the authority
    /// - `InvocationError::Storage` if the store cannot be read
    pub fn require(sender: PrincipalId, storage: &impl Storage) -> Result<(), InvocationError> {
        let authority = storage.load_authority()?.ok_or(Rejection::NoAuthority)?;

        if authority != sender {
            return Err(Rejection::NotAuthorized.into());
        }

        Ok(())
    }
}
