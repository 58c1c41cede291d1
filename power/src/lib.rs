//! Voting power for the tribunal ledger.
//!
//! Power has two sources: active stake weighted by how long it is locked,
//! and reward tokens already earned on the platform. Members may entrust
//! their power to a representative; a delegator's own ballot then counts
//! for nothing until they undelegate, so no unit of power is ever counted
//! twice.

pub mod calculator;
pub mod delegation;
pub mod error;

pub use calculator::{PowerAssessment, PowerCalculator};
pub use delegation::DelegationRegister;
pub use error::PowerError;
