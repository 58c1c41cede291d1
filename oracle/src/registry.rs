//! Oracle registry — membership management and activity refresh.

use crate::cohort::{Oracle, OracleMember};
use crate::error::OracleError;
use std::collections::HashMap;
use tribunal_types::{LedgerParams, MemberAddress, Timestamp};

const SECS_PER_DAY: u64 = 24 * 3600;

/// Activity numbers produced by a refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleStatus {
    pub is_active: bool,
    pub active_members: u32,
    pub total_members: u32,
}

/// The oracle registry — tracks every cohort and its activity status.
///
/// Anyone may refresh an oracle's status; the computation only reads
/// participation timestamps, so there is nothing to abuse. Between
/// refreshes the cached flag is served as-is.
pub struct OracleRegistry {
    oracles: HashMap<String, Oracle>,
    activity_threshold_days: u64,
    min_active_members: u32,
}

impl OracleRegistry {
    pub fn new() -> Self {
        Self::with_params(&LedgerParams::default())
    }

    pub fn with_params(params: &LedgerParams) -> Self {
        Self {
            oracles: HashMap::new(),
            activity_threshold_days: params.oracle_activity_threshold_days,
            min_active_members: params.min_oracle_members,
        }
    }

    /// Register a new, empty, inactive oracle.
    pub fn add_oracle(&mut self, name: &str, now: Timestamp) -> Result<(), OracleError> {
        if self.oracles.contains_key(name) {
            return Err(OracleError::DuplicateOracle(name.to_string()));
        }
        self.oracles
            .insert(name.to_string(), Oracle::new(name, now));
        Ok(())
    }

    /// Add a member to an oracle. Joining counts as participation, and the
    /// cached status is recomputed so the oracle can activate immediately.
    pub fn add_member(
        &mut self,
        oracle: &str,
        member: MemberAddress,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let threshold_secs = self.threshold_secs();
        let min_members = self.min_active_members;
        let cohort = self
            .oracles
            .get_mut(oracle)
            .ok_or_else(|| OracleError::UnknownOracle(oracle.to_string()))?;
        if cohort.is_member(&member) {
            return Err(OracleError::AlreadyMember {
                oracle: oracle.to_string(),
                member: member.to_string(),
            });
        }
        cohort.members.push(OracleMember {
            address: member,
            last_participation: now,
        });
        refresh_oracle(cohort, threshold_secs, min_members, now);
        Ok(())
    }

    /// Remove a member and recompute the cached status.
    pub fn remove_member(
        &mut self,
        oracle: &str,
        member: &MemberAddress,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let threshold_secs = self.threshold_secs();
        let min_members = self.min_active_members;
        let cohort = self
            .oracles
            .get_mut(oracle)
            .ok_or_else(|| OracleError::UnknownOracle(oracle.to_string()))?;
        let before = cohort.members.len();
        cohort.members.retain(|m| m.address != *member);
        if cohort.members.len() == before {
            return Err(OracleError::NotMember {
                oracle: oracle.to_string(),
                member: member.to_string(),
            });
        }
        refresh_oracle(cohort, threshold_secs, min_members, now);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Oracle> {
        self.oracles.get(name)
    }

    pub fn oracles(&self) -> impl Iterator<Item = &Oracle> {
        self.oracles.values()
    }

    /// Cached active flag. An unknown oracle reads as inactive.
    pub fn is_active(&self, name: &str) -> bool {
        self.oracles.get(name).map(|o| o.is_active).unwrap_or(false)
    }

    /// Stamp `now` as the member's last participation in every cohort they
    /// sit on. Returns how many cohorts were touched.
    pub fn record_participation(&mut self, member: &MemberAddress, now: Timestamp) -> usize {
        let mut touched = 0;
        for cohort in self.oracles.values_mut() {
            if let Some(m) = cohort.member_mut(member) {
                m.last_participation = now;
                touched += 1;
            }
        }
        touched
    }

    /// Recompute and cache an oracle's activity status.
    pub fn refresh_status(
        &mut self,
        name: &str,
        now: Timestamp,
    ) -> Result<OracleStatus, OracleError> {
        let threshold_secs = self.threshold_secs();
        let min_members = self.min_active_members;
        let cohort = self
            .oracles
            .get_mut(name)
            .ok_or_else(|| OracleError::UnknownOracle(name.to_string()))?;
        Ok(refresh_oracle(cohort, threshold_secs, min_members, now))
    }

    /// Change the activity threshold. Only future refreshes see the new
    /// value; cached flags keep whatever they were computed with.
    pub fn set_activity_threshold(&mut self, days: u64) -> Result<(), OracleError> {
        if !(LedgerParams::MIN_ACTIVITY_THRESHOLD_DAYS..=LedgerParams::MAX_ACTIVITY_THRESHOLD_DAYS)
            .contains(&days)
        {
            return Err(OracleError::ThresholdOutOfBounds {
                got: days,
                min: LedgerParams::MIN_ACTIVITY_THRESHOLD_DAYS,
                max: LedgerParams::MAX_ACTIVITY_THRESHOLD_DAYS,
            });
        }
        self.activity_threshold_days = days;
        Ok(())
    }

    pub fn activity_threshold_days(&self) -> u64 {
        self.activity_threshold_days
    }

    fn threshold_secs(&self) -> u64 {
        self.activity_threshold_days * SECS_PER_DAY
    }
}

fn refresh_oracle(
    oracle: &mut Oracle,
    threshold_secs: u64,
    min_members: u32,
    now: Timestamp,
) -> OracleStatus {
    let active = oracle.count_active(threshold_secs, now);
    oracle.active_members = active;
    oracle.is_active = active >= min_members;
    oracle.refreshed_at = now;
    OracleStatus {
        is_active: oracle.is_active,
        active_members: active,
        total_members: oracle.members.len() as u32,
    }
}

impl OracleRegistry {
    /// Persist all registry state to an oracle store.
    pub fn save_to_store(
        &self,
        store: &dyn tribunal_store::OracleStore,
    ) -> Result<(), OracleError> {
        let params = (self.activity_threshold_days, self.min_active_members);
        let params_bytes =
            bincode::serialize(&params).map_err(|e| OracleError::Store(e.to_string()))?;
        store
            .put_meta(b"activity_params", &params_bytes)
            .map_err(|e| OracleError::Store(e.to_string()))?;

        for (name, oracle) in &self.oracles {
            let bytes =
                bincode::serialize(oracle).map_err(|e| OracleError::Store(e.to_string()))?;
            store
                .put_oracle(name, &bytes)
                .map_err(|e| OracleError::Store(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore registry state from an oracle store. Falls back to `params`
    /// for anything the store has never seen.
    pub fn load_from_store(
        store: &dyn tribunal_store::OracleStore,
        params: &LedgerParams,
    ) -> Result<Self, OracleError> {
        let (activity_threshold_days, min_active_members) =
            match store.get_meta(b"activity_params") {
                Ok(Some(bytes)) => bincode::deserialize(&bytes)
                    .map_err(|e| OracleError::Store(e.to_string()))?,
                _ => (
                    params.oracle_activity_threshold_days,
                    params.min_oracle_members,
                ),
            };

        let entries = store
            .iter_oracles()
            .map_err(|e| OracleError::Store(e.to_string()))?;
        let mut oracles = HashMap::new();
        for (name, bytes) in entries {
            let oracle: Oracle =
                bincode::deserialize(&bytes).map_err(|e| OracleError::Store(e.to_string()))?;
            oracles.insert(name, oracle);
        }
        Ok(Self {
            oracles,
            activity_threshold_days,
            min_active_members,
        })
    }
}

impl Default for OracleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
