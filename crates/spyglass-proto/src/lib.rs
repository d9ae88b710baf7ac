//! # Spyglass Protocol: Identifiers and Call Envelopes
//!
//! This crate defines the data that crosses the boundary between a ledger
//! host and the Spyglass state machine:
//!
//! - **Identifiers**: [`AgentId`], [`PrincipalId`] and [`SharedSecret`]
//! - **Messages**: [`SpyMessage`], the fixed-format numbered message an agent
//!   submits
//! - **Calls**: [`Call`] names one of the three state transitions, and
//!   [`Envelope`] pairs it with the authenticated sender
//!
//! ## Encoding
//!
//! Envelopes are CBOR-encoded. The host decodes an envelope before handing
//! the call to the state machine, so malformed input never reaches protocol
//! logic. Decoding enforces [`Envelope::MAX_ENCODED_SIZE`] before any CBOR
//! parsing begins.
//!
//! ## Message Payloads
//!
//! A message body is exactly twelve decimal characters, carried as a bounded
//! integer rather than a string. See [`MIN_PAYLOAD`] and [`MAX_PAYLOAD`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod call;
pub mod errors;
pub mod ids;
pub mod message;

pub use call::{Call, Envelope};
pub use errors::{ProtocolError, Result};
pub use ids::{AgentId, PrincipalId, SharedSecret};
pub use message::{INITIAL_SEQUENCE_NUMBER, MAX_PAYLOAD, MIN_PAYLOAD, SpyMessage};
