//! Progressive reward mathematics for the tribunal ledger.
//!
//! Reward tokens are minted against cumulative platform volume through a
//! schedule of bands: early volume earns at high rates, later volume at
//! progressively lower ones. A single payment that straddles a band
//! boundary is priced piecewise, never at one blended rate. Referrers take
//! a fixed cut of each payment's notional value before the payee's share is
//! priced.

pub mod bands;
pub mod error;
pub mod payment;
pub mod referral;

pub use bands::{BandSchedule, RewardBand};
pub use error::RewardError;
pub use payment::{PaymentRewards, RewardCalculator, RewardShare, ShareKind};
pub use referral::referral_cut;
