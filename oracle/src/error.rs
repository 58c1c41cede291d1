//! Oracle-specific errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle {0} already exists")]
    DuplicateOracle(String),

    #[error("unknown oracle: {0}")]
    UnknownOracle(String),

    #[error("{member} is already a member of oracle {oracle}")]
    AlreadyMember { oracle: String, member: String },

    #[error("{member} is not a member of oracle {oracle}")]
    NotMember { oracle: String, member: String },

    #[error("activity threshold must be {min}..={max} days, got {got}")]
    ThresholdOutOfBounds { got: u64, min: u64, max: u64 },

    #[error("storage error: {0}")]
    Store(String),
}
