use crate::RegistryError;
use serde::{Deserialize, Serialize};
use tribunal_types::{MemberAddress, Timestamp};

/// A member's stake position as reported by the staking contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeInfo {
    /// Raw staked amount.
    pub amount: u128,
    /// When the stake unlocks.
    pub unlock_time: Timestamp,
    /// The lock duration the member committed to, in minutes. Voting power
    /// scales with this, so longer commitments weigh more.
    pub duration_minutes: u64,
    /// Whether the stake currently counts. Inactive stakes contribute
    /// nothing to power or eligibility.
    pub is_active: bool,
}

/// Read access to the staking contract.
pub trait StakeRegistry {
    /// The member's stake position, `None` when they never staked.
    fn stake_info(&self, member: &MemberAddress) -> Result<Option<StakeInfo>, RegistryError>;
}
