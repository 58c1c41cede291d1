//! The reward ledger engine.

use crate::error::LedgerError;
use crate::state::{BandReward, MemberRewards};
use std::collections::HashMap;
use tribunal_rewards::BandSchedule;
use tribunal_types::{MemberAddress, TokenAmount};

/// Tracks earned, unlocked and claimed reward tokens per member and band.
///
/// The band rates live in the schedule, not here; every claim computation
/// takes the active schedule as an argument so a governed schedule swap
/// never leaves stale rates inside the ledger.
pub struct RewardLedger {
    pub members: HashMap<MemberAddress, MemberRewards>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    pub fn member(&self, address: &MemberAddress) -> Option<&MemberRewards> {
        self.members.get(address)
    }

    /// Credit earned (still locked) tokens to a member under a band.
    /// Crediting zero tokens is a no-op and creates no entry.
    pub fn record_earning(
        &mut self,
        member: &MemberAddress,
        band: usize,
        tokens: TokenAmount,
    ) -> Result<(), LedgerError> {
        if tokens.is_zero() {
            return Ok(());
        }
        let entry = self
            .members
            .entry(member.clone())
            .or_default()
            .entry(band);
        entry.earned = entry
            .earned
            .checked_add(tokens)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Count one qualifying governance action under `band`. This is the
    /// only unlock mechanism; there is deliberately no call that unlocks
    /// earned tokens directly.
    pub fn record_governance_action(
        &mut self,
        member: &MemberAddress,
        band: usize,
    ) -> Result<(), LedgerError> {
        let entry = self
            .members
            .entry(member.clone())
            .or_default()
            .entry(band);
        entry.governance_actions = entry
            .governance_actions
            .checked_add(1)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Tokens the member could claim right now under the given schedule.
    ///
    /// Per band: `min(earned - claimed, actions × rate)`. Each action
    /// unlocks one rate-unit's worth of tokens in its band, so earnings
    /// from an early high-rate band unlock faster per action than later
    /// ones.
    pub fn claimable_of(
        &self,
        member: &MemberAddress,
        schedule: &BandSchedule,
    ) -> Result<TokenAmount, LedgerError> {
        let Some(rewards) = self.members.get(member) else {
            return Ok(TokenAmount::ZERO);
        };
        let mut total = TokenAmount::ZERO;
        for entry in &rewards.bands {
            let claimable = claimable_in_band(entry, band_rate(schedule, entry.band)?);
            total = total
                .checked_add(TokenAmount::new(claimable))
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(total)
    }

    /// Consume `amount` of the member's claimable tokens, walking bands in
    /// first-touch order. Rejects without mutating when `amount` exceeds
    /// the total claimable, so `claimed <= earned` can never break.
    pub fn mark_claimed(
        &mut self,
        member: &MemberAddress,
        amount: TokenAmount,
        schedule: &BandSchedule,
    ) -> Result<(), LedgerError> {
        let claimable = self.claimable_of(member, schedule)?;
        if amount > claimable {
            return Err(LedgerError::ClaimExceedsClaimable {
                requested: amount.raw(),
                claimable: claimable.raw(),
            });
        }
        if amount.is_zero() {
            return Ok(());
        }
        let rewards = self
            .members
            .get_mut(member)
            .expect("claimable above zero implies entries exist");
        let mut remaining = amount.raw();
        for entry in &mut rewards.bands {
            if remaining == 0 {
                break;
            }
            let take = claimable_in_band(entry, band_rate(schedule, entry.band)?).min(remaining);
            if take == 0 {
                continue;
            }
            entry.claimed = entry
                .claimed
                .checked_add(TokenAmount::new(take))
                .ok_or(LedgerError::Overflow)?;
            remaining -= take;
        }
        debug_assert_eq!(remaining, 0, "claim walk must consume the full amount");
        Ok(())
    }
}

/// `min(earned - claimed, actions × rate)` for one band entry.
fn claimable_in_band(entry: &BandReward, rate: u128) -> u128 {
    let locked = entry.locked().raw();
    let action_allowance = (entry.governance_actions as u128).saturating_mul(rate);
    locked.min(action_allowance)
}

fn band_rate(schedule: &BandSchedule, band: usize) -> Result<u128, LedgerError> {
    schedule
        .get(band)
        .map(|b| b.rate)
        .ok_or(LedgerError::UnknownBand(band))
}

impl RewardLedger {
    /// Persist all per-member state to a reward store.
    pub fn save_to_store(
        &self,
        store: &dyn tribunal_store::RewardStore,
    ) -> Result<(), LedgerError> {
        for (member, rewards) in &self.members {
            let bytes =
                bincode::serialize(rewards).map_err(|e| LedgerError::Store(e.to_string()))?;
            store
                .put_member(member, &bytes)
                .map_err(|e| LedgerError::Store(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore ledger state from a reward store.
    pub fn load_from_store(
        store: &dyn tribunal_store::RewardStore,
    ) -> Result<Self, LedgerError> {
        let entries = store
            .iter_members()
            .map_err(|e| LedgerError::Store(e.to_string()))?;
        let mut members = HashMap::new();
        for (address, bytes) in entries {
            let rewards: MemberRewards =
                bincode::deserialize(&bytes).map_err(|e| LedgerError::Store(e.to_string()))?;
            members.insert(address, rewards);
        }
        Ok(Self { members })
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new()
    }
}
