//! Oracle cohorts for the tribunal ledger.
//!
//! An oracle is a named group of members trusted to vote on cases in its
//! area. Members fall inactive when they stop participating; an oracle as a
//! whole is active only while enough of its members are. Case creation
//! consults the cached active flag, so staleness is bounded by how often
//! someone refreshes.

pub mod cohort;
pub mod error;
pub mod registry;

pub use cohort::{Oracle, OracleMember};
pub use error::OracleError;
pub use registry::{OracleRegistry, OracleStatus};
