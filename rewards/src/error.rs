//! Reward math errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("band schedule is empty")]
    EmptySchedule,

    #[error("first band must start at zero")]
    FirstBandNotZero,

    #[error("band {0} is empty or inverted")]
    EmptyBand(usize),

    #[error("band {0} does not start where the previous band ends")]
    Discontiguous(usize),

    #[error("band {0} has a higher rate than the band before it")]
    RateIncreases(usize),

    #[error("last band must be open-ended")]
    LastBandClosed,

    #[error("no band contains cumulative value {0}")]
    NoBandForValue(u128),

    #[error("invalid range: from {from} exceeds to {to}")]
    InvalidRange { from: u128, to: u128 },

    #[error("payment amount {amount} exceeds new cumulative total {new_total}")]
    CumulativeMismatch { amount: u128, new_total: u128 },

    #[error("arithmetic overflow in reward computation")]
    Overflow,
}
