use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("claim of {requested} exceeds claimable {claimable}")]
    ClaimExceedsClaimable { requested: u128, claimable: u128 },

    #[error("band {0} is not in the active schedule")]
    UnknownBand(usize),

    #[error("arithmetic overflow in ledger computation")]
    Overflow,

    #[error("storage error: {0}")]
    Store(String),
}
