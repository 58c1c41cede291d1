use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("oracle {0} is not active")]
    OracleInactive(String),

    #[error("invalid raiser address: {0}")]
    InvalidRaiser(String),

    #[error("invalid claim address: {0}")]
    InvalidClaimAddress(String),

    #[error("case {0} not found")]
    CaseNotFound(String),

    #[error("member {0} is not eligible to vote")]
    NotEligible(String),

    #[error("member {voter} has already voted on case {case}")]
    AlreadyVoted { case: String, voter: String },

    #[error("member {0} has zero vote weight")]
    ZeroVoteWeight(String),

    #[error("voting on case {0} has closed")]
    VotingClosed(String),

    #[error("voting on case {case} is still open for {remaining_secs}s")]
    VotingStillOpen { case: String, remaining_secs: u64 },

    #[error("case {0} is already finalized")]
    AlreadyFinalized(String),

    #[error("zero total winning weight on case {0}")]
    ZeroWinningWeight(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("store error: {0}")]
    Store(String),
}
