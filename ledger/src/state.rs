//! Per-member reward state.

use serde::{Deserialize, Serialize};
use tribunal_types::TokenAmount;

/// One member's standing in one reward band.
///
/// Invariant: `claimed <= earned`, always. The engine is the only writer
/// and enforces it on every mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandReward {
    /// Index into the band schedule this was earned under.
    pub band: usize,
    pub earned: TokenAmount,
    pub claimed: TokenAmount,
    /// Qualifying governance actions performed under this band. Never
    /// decremented.
    pub governance_actions: u64,
}

impl BandReward {
    pub fn new(band: usize) -> Self {
        Self {
            band,
            earned: TokenAmount::ZERO,
            claimed: TokenAmount::ZERO,
            governance_actions: 0,
        }
    }

    /// Earned tokens not yet claimed, before the governance gate.
    pub fn locked(&self) -> TokenAmount {
        self.earned.saturating_sub(self.claimed)
    }
}

/// All band entries for one member, in first-touch order.
///
/// Claims walk this Vec front to back, so the order is part of the
/// contract and survives serialization untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRewards {
    pub bands: Vec<BandReward>,
}

impl MemberRewards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, band: usize) -> Option<&BandReward> {
        self.bands.iter().find(|b| b.band == band)
    }

    /// The entry for `band`, created at the back if this is the first
    /// touch.
    pub fn entry(&mut self, band: usize) -> &mut BandReward {
        if let Some(i) = self.bands.iter().position(|b| b.band == band) {
            &mut self.bands[i]
        } else {
            self.bands.push(BandReward::new(band));
            self.bands.last_mut().expect("just pushed")
        }
    }

    pub fn total_earned(&self) -> TokenAmount {
        self.bands
            .iter()
            .fold(TokenAmount::ZERO, |acc, b| acc.saturating_add(b.earned))
    }

    pub fn total_claimed(&self) -> TokenAmount {
        self.bands
            .iter()
            .fold(TokenAmount::ZERO, |acc, b| acc.saturating_add(b.claimed))
    }
}
