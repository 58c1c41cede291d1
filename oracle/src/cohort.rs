//! Oracle cohort state.

use serde::{Deserialize, Serialize};
use tribunal_types::{MemberAddress, Timestamp};

/// One member of an oracle, with their last recorded participation.
///
/// Joining counts as participation, so a fresh member is active until a
/// full threshold period passes without them voting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleMember {
    pub address: MemberAddress,
    pub last_participation: Timestamp,
}

/// A named oracle cohort.
///
/// `is_active` and `active_members` are caches; they reflect the last
/// refresh, not the current clock. Membership is a Vec because cohorts are
/// small and iteration order should survive a snapshot round-trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Oracle {
    pub name: String,
    pub members: Vec<OracleMember>,
    pub is_active: bool,
    pub active_members: u32,
    /// When the cached status was last recomputed.
    pub refreshed_at: Timestamp,
}

impl Oracle {
    pub fn new(name: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            is_active: false,
            active_members: 0,
            refreshed_at: created_at,
        }
    }

    pub fn is_member(&self, address: &MemberAddress) -> bool {
        self.members.iter().any(|m| m.address == *address)
    }

    pub fn member_mut(&mut self, address: &MemberAddress) -> Option<&mut OracleMember> {
        self.members.iter_mut().find(|m| m.address == *address)
    }

    /// Count members whose last participation is strictly within the
    /// threshold. A member exactly at the threshold is stale.
    pub fn count_active(&self, threshold_secs: u64, now: Timestamp) -> u32 {
        self.members
            .iter()
            .filter(|m| !m.last_participation.has_expired(threshold_secs, now))
            .count() as u32
    }
}
