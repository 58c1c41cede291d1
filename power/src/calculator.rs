//! Voting power computation.
//!
//! `power = stake_amount × lock_duration_minutes + earned_tokens`
//!
//! The stake registry and escrow are optional collaborators: an absent or
//! failing one contributes zero rather than failing the caller, so a vote
//! is never blocked by a platform contract being down. All arithmetic
//! saturates; weight is not money, so clamping at the top is harmless.

use crate::error::PowerError;
use std::sync::Arc;
use tribunal_registry::{Escrow, StakeInfo, StakeRegistry};
use tribunal_types::{LedgerParams, MemberAddress};

/// Everything the voting engine wants to know about one member, read in a
/// single pass over the collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerAssessment {
    pub stake_weight: u128,
    pub earned_weight: u128,
    pub power: u128,
    pub eligible: bool,
}

/// Computes voting power and eligibility from platform state.
pub struct PowerCalculator {
    stakes: Option<Arc<dyn StakeRegistry + Send + Sync>>,
    escrow: Option<Arc<dyn Escrow + Send + Sync>>,
    min_voting_power: u128,
    min_stake_eligibility: u128,
}

impl PowerCalculator {
    pub fn new(
        params: &LedgerParams,
        stakes: Option<Arc<dyn StakeRegistry + Send + Sync>>,
        escrow: Option<Arc<dyn Escrow + Send + Sync>>,
    ) -> Self {
        Self {
            stakes,
            escrow,
            min_voting_power: params.min_voting_power,
            min_stake_eligibility: params.min_stake_eligibility,
        }
    }

    /// A calculator with no collaborators: every member has zero power.
    /// Mostly useful in tests.
    pub fn detached(params: &LedgerParams) -> Self {
        Self::new(params, None, None)
    }

    /// Assess a member's power and eligibility in one collaborator pass.
    pub fn assess(&self, member: &MemberAddress) -> PowerAssessment {
        let stake = self.stake_info(member);
        let active_stake = stake
            .as_ref()
            .filter(|s| s.is_active)
            .map(|s| s.amount)
            .unwrap_or(0);
        let stake_weight = stake
            .as_ref()
            .filter(|s| s.is_active)
            .map(|s| s.amount.saturating_mul(s.duration_minutes as u128))
            .unwrap_or(0);
        let earned_weight = self.earned_weight(member);
        let power = stake_weight.saturating_add(earned_weight);
        let eligible =
            power >= self.min_voting_power || active_stake >= self.min_stake_eligibility;
        PowerAssessment {
            stake_weight,
            earned_weight,
            power,
            eligible,
        }
    }

    /// Combined voting power for a member.
    pub fn power(&self, member: &MemberAddress) -> u128 {
        self.assess(member).power
    }

    /// Whether the member may vote at all.
    pub fn eligible(&self, member: &MemberAddress) -> bool {
        self.assess(member).eligible
    }

    fn stake_info(&self, member: &MemberAddress) -> Option<StakeInfo> {
        self.stakes
            .as_ref()
            .and_then(|reg| reg.stake_info(member).ok())
            .flatten()
    }

    fn earned_weight(&self, member: &MemberAddress) -> u128 {
        self.escrow
            .as_ref()
            .and_then(|esc| esc.earned_tokens(member).ok())
            .map(|t| t.raw())
            .unwrap_or(0)
    }
}
