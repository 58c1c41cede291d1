//! Nullable collaborators — stake, escrow, and profile contracts that
//! answer from fixtures and record what was asked of them.

use std::collections::HashMap;
use std::sync::Mutex;
use tribunal_registry::{
    Escrow, ProfileRegistry, RegistryError, StakeInfo, StakeRegistry,
};
use tribunal_types::{CurrencyAmount, MemberAddress, SubjectId, TokenAmount, WinningSide};

/// A stake registry answering from a fixed table.
pub struct NullStakeRegistry {
    stakes: Mutex<HashMap<MemberAddress, StakeInfo>>,
    fail_all: bool,
}

impl NullStakeRegistry {
    pub fn new() -> Self {
        Self {
            stakes: Mutex::new(HashMap::new()),
            fail_all: false,
        }
    }

    /// A registry where every call fails, for exercising degradation paths.
    pub fn unreachable() -> Self {
        Self {
            stakes: Mutex::new(HashMap::new()),
            fail_all: true,
        }
    }

    pub fn set_stake(&self, member: MemberAddress, info: StakeInfo) {
        self.stakes.lock().unwrap().insert(member, info);
    }
}

impl Default for NullStakeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StakeRegistry for NullStakeRegistry {
    fn stake_info(&self, member: &MemberAddress) -> Result<Option<StakeInfo>, RegistryError> {
        if self.fail_all {
            return Err(RegistryError::Unavailable("null stake registry".into()));
        }
        Ok(self.stakes.lock().unwrap().get(member).cloned())
    }
}

/// An escrow contract that records every instruction instead of moving
/// funds.
pub struct NullEscrow {
    earned: Mutex<HashMap<MemberAddress, TokenAmount>>,
    released: Mutex<Vec<(SubjectId, WinningSide)>>,
    refunded: Mutex<Vec<(SubjectId, MemberAddress, CurrencyAmount)>>,
    governance_actions: Mutex<Vec<MemberAddress>>,
    fail_writes: bool,
}

impl NullEscrow {
    pub fn new() -> Self {
        Self {
            earned: Mutex::new(HashMap::new()),
            released: Mutex::new(Vec::new()),
            refunded: Mutex::new(Vec::new()),
            governance_actions: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// An escrow whose write instructions all fail. Reads still answer, so
    /// voting power is unaffected.
    pub fn rejecting_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn set_earned(&self, member: MemberAddress, tokens: TokenAmount) {
        self.earned.lock().unwrap().insert(member, tokens);
    }

    /// Disputed-funds releases recorded so far (for assertions).
    pub fn released(&self) -> Vec<(SubjectId, WinningSide)> {
        self.released.lock().unwrap().clone()
    }

    /// Fee refunds recorded so far (for assertions).
    pub fn refunded(&self) -> Vec<(SubjectId, MemberAddress, CurrencyAmount)> {
        self.refunded.lock().unwrap().clone()
    }

    /// Governance-action notifications recorded so far (for assertions).
    pub fn governance_actions(&self) -> Vec<MemberAddress> {
        self.governance_actions.lock().unwrap().clone()
    }

    fn write_guard(&self) -> Result<(), RegistryError> {
        if self.fail_writes {
            Err(RegistryError::Rejected("null escrow rejects writes".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for NullEscrow {
    fn default() -> Self {
        Self::new()
    }
}

impl Escrow for NullEscrow {
    fn earned_tokens(&self, member: &MemberAddress) -> Result<TokenAmount, RegistryError> {
        Ok(self
            .earned
            .lock()
            .unwrap()
            .get(member)
            .copied()
            .unwrap_or(TokenAmount::ZERO))
    }

    fn release_disputed_funds(
        &self,
        subject: &SubjectId,
        side: WinningSide,
    ) -> Result<(), RegistryError> {
        self.write_guard()?;
        self.released.lock().unwrap().push((subject.clone(), side));
        Ok(())
    }

    fn refund_fee(
        &self,
        subject: &SubjectId,
        raiser: &MemberAddress,
        amount: CurrencyAmount,
    ) -> Result<(), RegistryError> {
        self.write_guard()?;
        self.refunded
            .lock()
            .unwrap()
            .push((subject.clone(), raiser.clone(), amount));
        Ok(())
    }

    fn increment_governance_action(&self, member: &MemberAddress) -> Result<(), RegistryError> {
        self.write_guard()?;
        self.governance_actions.lock().unwrap().push(member.clone());
        Ok(())
    }
}

/// A profile registry answering referrer lookups from a fixed table.
pub struct NullProfiles {
    referrers: Mutex<HashMap<MemberAddress, MemberAddress>>,
}

impl NullProfiles {
    pub fn new() -> Self {
        Self {
            referrers: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_referrer(&self, member: MemberAddress, referrer: MemberAddress) {
        self.referrers.lock().unwrap().insert(member, referrer);
    }
}

impl Default for NullProfiles {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry for NullProfiles {
    fn referrer_of(
        &self,
        member: &MemberAddress,
    ) -> Result<Option<MemberAddress>, RegistryError> {
        Ok(self.referrers.lock().unwrap().get(member).cloned())
    }
}
