//! Case state tracking.

use serde::{Deserialize, Serialize};
use tribunal_types::{
    CaseId, CaseKind, CurrencyAmount, MemberAddress, SubjectId, Timestamp, VoteDirection,
    WinningSide,
};

/// One dispute, skill-verification application, or advisory question.
///
/// A case is mutable only through vote-weight accumulation while its window
/// is open, then transitions exactly once to finalized. The engine is the
/// sole writer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub subject: SubjectId,
    pub kind: CaseKind,
    /// The oracle whose members this case is addressed to.
    pub oracle: String,
    /// Opaque evidence reference, e.g. an IPFS CID.
    pub evidence: String,
    /// Fee pool distributed to winning voters at settlement.
    pub fee: CurrencyAmount,
    /// Funds in escrow contested by the case. Zero for skill verification
    /// and advisory questions.
    pub disputed_amount: CurrencyAmount,
    pub raiser: MemberAddress,
    pub created_at: Timestamp,
    pub votes: Vec<VoteRecord>,
    pub votes_for: u128,
    pub votes_against: u128,
    pub finalized: bool,
    pub winning_side: Option<WinningSide>,
}

/// A single cast vote. Weight is frozen at cast time and never recomputed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: MemberAddress,
    /// Where this voter's fee share is paid. May differ from the voter.
    pub claim_address: MemberAddress,
    pub direction: VoteDirection,
    pub weight: u128,
    pub cast_at: Timestamp,
}

impl Case {
    pub fn has_voted(&self, member: &MemberAddress) -> bool {
        self.votes.iter().any(|v| &v.voter == member)
    }

    pub fn total_votes(&self) -> u128 {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Whether the voting window is still open at `now`.
    pub fn voting_open(&self, voting_period_secs: u64, now: Timestamp) -> bool {
        !self.created_at.has_expired(voting_period_secs, now)
    }

    /// The direction that sided with `side`.
    pub fn direction_for(side: WinningSide) -> VoteDirection {
        match side {
            WinningSide::Raiser => VoteDirection::For,
            WinningSide::Counterparty => VoteDirection::Against,
        }
    }

    /// Votes cast for the given side, as (claim address, weight) pairs ready
    /// for fee distribution.
    pub fn voters_on(&self, side: WinningSide) -> Vec<(MemberAddress, u128)> {
        let direction = Self::direction_for(side);
        self.votes
            .iter()
            .filter(|v| v.direction == direction)
            .map(|v| (v.claim_address.clone(), v.weight))
            .collect()
    }
}
