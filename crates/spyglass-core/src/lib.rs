//! Spyglass protocol core logic
//!
//! This crate contains the pure state machine that decides which authority,
//! agent and message transitions a ledger accepts. It is completely decoupled
//! from I/O: state is read through an injected [`storage::Storage`], and
//! accepted transitions come back as [`ProtocolAction`]s for the host to
//! apply.
//!
//! # Architecture
//!
//! ```text
//!      ┌──────────────────────────────┐
//!      │ spyglass-core                │
//!      │ - Authority register         │
//!      │ - Agent directory            │
//!      │ - Message validator          │
//!      └──────────────────────────────┘
//!         ↓                        ↓
//! ┌──────────────────┐  ┌──────────────────┐
//! │ spyglass-harness │  │ ledger runtime   │
//! │ - SimLedger      │  │ - Signatures     │
//! │ - Seeded keys    │  │ - Block ordering │
//! │ - Scenarios      │  │ - Durable state  │
//! └──────────────────┘  └──────────────────┘
//! ```
//!
//! # Key Principles
//!
//! - No writes in Core: operations only read from `Storage`; mutations are
//!   returned as actions
//! - All-or-nothing: a rejected invocation returns no actions, an accepted one
//!   returns at most one
//! - Deterministic: the same state and invocation always produce the same
//!   outcome
//!
//! # Modules
//!
//! - [`protocol`]: `MessageProtocol`, the three transitions and call dispatch
//! - [`authority`]: Authority register (spy master)
//! - [`directory`]: Agent directory (recruitment)
//! - [`validator`]: Message validation pipeline
//! - [`storage`]: Key-value store abstraction and in-memory implementation
//! - [`env`]: Identity oracle for the current invocation
//! - [`error`]: Rejection reasons and invocation errors

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authority;
pub mod config;
pub mod directory;
pub mod env;
pub mod error;
pub mod protocol;
pub mod state;
pub mod storage;
pub mod validator;

pub use config::{ConfigError, ProtocolConfig};
pub use error::{InvocationError, Rejection};
pub use protocol::{MessageProtocol, ProtocolAction};
pub use state::AgentRecord;
