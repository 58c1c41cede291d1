//! Governance-gated reward ledger.
//!
//! Earned reward tokens start locked. Each qualifying governance action a
//! member performs unlocks one rate-unit's worth of tokens in the band the
//! action happened under; claims then consume unlocked tokens band by band
//! in first-touch order. There is no way to claim earned tokens without
//! participating, and no band can ever have more claimed than earned.

pub mod engine;
pub mod error;
pub mod state;

pub use engine::RewardLedger;
pub use error::LedgerError;
pub use state::{BandReward, MemberRewards};
