//! The tribunal service — everything wired together.
//!
//! The engine crates (`tribunal-voting`, `tribunal-oracle`,
//! `tribunal-ledger`, …) are pure state machines: they mutate in-memory
//! state and return instructions, never touching storage, collaborators, or
//! the transport. This crate composes them into one operation surface:
//!
//! - every public operation runs as one indivisible unit, serialized per
//!   key (per case id, per member) so unrelated work proceeds concurrently;
//! - engine state is persisted to the store after every mutation;
//! - settlement instructions (escrow releases, refunds, oracle admissions,
//!   result relays) are executed here, after the state transition has
//!   committed;
//! - inbound cross-chain messages are validated and applied here.

pub mod config;
pub mod error;
pub mod locks;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use service::{Collaborators, SettlementReport, Stores, TribunalService};
