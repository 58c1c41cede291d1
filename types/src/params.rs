//! Ledger parameters — every governance-tunable value in one place.
//!
//! Parameter changes arrive through the same governed message path as
//! everything else; the structs here only define the values and their
//! defaults.

use serde::{Deserialize, Serialize};

/// All tunable parameters of the dispute and reward ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerParams {
    // ── Voting ───────────────────────────────────────────────────────────
    /// Length of a case's voting window in seconds, measured from creation.
    /// Default: 4 days.
    pub voting_period_secs: u64,

    /// Minimum combined voting power (stake weight + earned tokens) required
    /// to vote. A member below this can still qualify through raw stake.
    pub min_voting_power: u128,

    /// Minimum raw active stake that qualifies a member to vote regardless
    /// of computed power.
    pub min_stake_eligibility: u128,

    // ── Oracles ──────────────────────────────────────────────────────────
    /// A member counts as active when they participated within this many
    /// days. Governable only within [`MIN_ACTIVITY_THRESHOLD_DAYS`,
    /// `MAX_ACTIVITY_THRESHOLD_DAYS`].
    ///
    /// [`MIN_ACTIVITY_THRESHOLD_DAYS`]: LedgerParams::MIN_ACTIVITY_THRESHOLD_DAYS
    /// [`MAX_ACTIVITY_THRESHOLD_DAYS`]: LedgerParams::MAX_ACTIVITY_THRESHOLD_DAYS
    pub oracle_activity_threshold_days: u64,

    /// Number of active members an oracle needs to accept new cases.
    pub min_oracle_members: u32,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Referrer share of a payment, in basis points (1000 = 10%). Applied
    /// once per existing referrer (payer's and payee's).
    pub referral_share_bps: u32,
}

impl LedgerParams {
    /// Lower bound on the activity threshold (days).
    pub const MIN_ACTIVITY_THRESHOLD_DAYS: u64 = 30;

    /// Upper bound on the activity threshold (days).
    pub const MAX_ACTIVITY_THRESHOLD_DAYS: u64 = 180;

    /// Tribunal defaults — the intended configuration for the live ledger.
    pub fn tribunal_defaults() -> Self {
        Self {
            voting_period_secs: 4 * 24 * 3600, // 4 days
            min_voting_power: 100_000,
            min_stake_eligibility: 10_000,

            oracle_activity_threshold_days: 90,
            min_oracle_members: 3,

            referral_share_bps: 1000, // 10%
        }
    }
}

/// Default is the tribunal configuration.
impl Default for LedgerParams {
    fn default() -> Self {
        Self::tribunal_defaults()
    }
}
