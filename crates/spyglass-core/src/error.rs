//! Error types for the Spyglass protocol core.
//!
//! This module separates two kinds of failure:
//! - Rejections: the invocation broke a protocol rule. The reason is part of
//!   the protocol and is reported to the caller verbatim.
//! - Storage errors: the host's store failed. These are host faults, not
//!   verdicts on the transaction.
//!
//! Both abort the invocation without producing any state mutation.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

/// Reason an invocation was rejected.
///
/// The `Display` output is the exact reason string reported to callers.
/// Clients match on it, so the strings are part of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No agent with the message's id has been recruited
    AgentNotRegistered,

    /// Presented security code differs from the stored one
    SecretMismatch,

    /// Payload has fewer than twelve digits
    MessageTooShort,

    /// Payload has more than twelve digits
    MessageTooLong,

    /// Sequence number is not above the last accepted one
    StaleOrDuplicateSequenceNumber,

    /// A spy master has already been assigned
    OnlyOneAuthority,

    /// Recruitment attempted before any spy master exists
    NoAuthority,

    /// Recruitment attempted by someone other than the spy master
    NotAuthorized,
}

impl Rejection {
    /// Every rejection reason, in declaration order.
    pub const ALL: [Rejection; 8] = [
        Self::AgentNotRegistered,
        Self::SecretMismatch,
        Self::MessageTooShort,
        Self::MessageTooLong,
        Self::StaleOrDuplicateSequenceNumber,
        Self::OnlyOneAuthority,
        Self::NoAuthority,
        Self::NotAuthorized,
    ];

    /// Reason string reported to the caller.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::AgentNotRegistered => {
                "Spy not recruited yet, no spy with that id has been initialized"
            },
            Self::SecretMismatch => "Security code does not match",
            Self::MessageTooShort => "Message is less than 12 characters long",
            Self::MessageTooLong => "Message is more than 12 characters long",
            Self::StaleOrDuplicateSequenceNumber => {
                "Message number is not greater than the last message number"
            },
            Self::OnlyOneAuthority => "There can be only one master",
            Self::NoAuthority => "There must be a spy master to recruit spies",
            Self::NotAuthorized => "Only the spy master can recruit spies",
        }
    }

    /// Look up a rejection by its reason string.
    ///
    /// Hosts that only persist the reason string use this to recover the
    /// typed rejection.
    pub fn from_reason(reason: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rejection| rejection.reason() == reason)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for Rejection {}

/// Errors returned by protocol operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The invocation broke a protocol rule
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The host's store failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl InvocationError {
    /// Returns true if this is a protocol rejection rather than a host fault.
    ///
    /// Rejections are final for the submitted transaction. Storage errors say
    /// nothing about the transaction and the host may resubmit it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection, if this is one.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            Self::Storage(_) => None,
        }
    }
}
