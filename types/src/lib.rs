//! Fundamental types for the tribunal dispute and reward ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: member addresses, amounts, identifiers, timestamps, ledger
//! parameters, and the case classification enums.

pub mod address;
pub mod amount;
pub mod case;
pub mod ids;
pub mod params;
pub mod time;

pub use address::MemberAddress;
pub use amount::{CurrencyAmount, TokenAmount};
pub use case::{CaseKind, VoteDirection, WinningSide};
pub use ids::{CaseId, SubjectId};
pub use params::LedgerParams;
pub use time::Timestamp;
