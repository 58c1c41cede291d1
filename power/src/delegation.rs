//! Vote delegation — entrust voting power to a representative.
//!
//! Delegation is transitive (A→B→C means A's power lands on C), with cycle
//! detection and a max-depth limit. While a delegation is active the
//! delegator's own ballot carries zero weight, so the same power can never
//! be counted on both sides of a case.

use crate::calculator::PowerCalculator;
use crate::error::PowerError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tribunal_types::MemberAddress;

/// Manages who votes through whom.
pub struct DelegationRegister {
    /// delegator → delegatee.
    delegations: HashMap<MemberAddress, MemberAddress>,
    /// Reverse index: delegatee → set of direct delegators.
    reverse_delegations: HashMap<MemberAddress, HashSet<MemberAddress>>,
    /// Maximum transitive chain depth.
    max_depth: usize,
}

impl DelegationRegister {
    pub fn new(max_depth: usize) -> Self {
        Self {
            delegations: HashMap::new(),
            reverse_delegations: HashMap::new(),
            max_depth,
        }
    }

    /// Set or update a delegation.
    pub fn delegate(
        &mut self,
        from: &MemberAddress,
        to: &MemberAddress,
    ) -> Result<(), PowerError> {
        if from == to {
            return Err(PowerError::SelfDelegation);
        }
        if let Some(old_to) = self.delegations.get(from) {
            if let Some(set) = self.reverse_delegations.get_mut(old_to) {
                set.remove(from);
                if set.is_empty() {
                    self.reverse_delegations.remove(old_to);
                }
            }
        }
        self.delegations.insert(from.clone(), to.clone());
        self.reverse_delegations
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        Ok(())
    }

    /// Remove a delegation. Removing a delegation that does not exist is a
    /// no-op.
    pub fn undelegate(&mut self, from: &MemberAddress) {
        if let Some(old_to) = self.delegations.remove(from) {
            if let Some(set) = self.reverse_delegations.get_mut(&old_to) {
                set.remove(from);
                if set.is_empty() {
                    self.reverse_delegations.remove(&old_to);
                }
            }
        }
    }

    /// Whether this member currently votes through someone else.
    pub fn has_delegated(&self, member: &MemberAddress) -> bool {
        self.delegations.contains_key(member)
    }

    /// Resolve the final delegatee for an address following the chain.
    /// Returns None if there is a cycle or the chain exceeds max_depth.
    pub fn resolve(&self, from: &MemberAddress) -> Option<MemberAddress> {
        let mut current = from.clone();
        let mut visited = HashSet::new();
        for _ in 0..self.max_depth {
            if !visited.insert(current.clone()) {
                return None; // Cycle detected
            }
            match self.delegations.get(&current) {
                Some(next) => current = next.clone(),
                None => return Some(current), // End of chain
            }
        }
        None // Exceeded max depth
    }

    /// Sum of the power of everyone whose chain resolves to `member`.
    ///
    /// Candidates come from a reverse-index BFS, then each is re-resolved
    /// forward; that filters out delegators sitting inside a cycle.
    pub fn delegated_weight(&self, member: &MemberAddress, calc: &PowerCalculator) -> u128 {
        let mut candidates = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(member.clone());
        while let Some(current) = queue.pop_front() {
            if let Some(delegators) = self.reverse_delegations.get(&current) {
                for d in delegators {
                    if candidates.insert(d.clone()) {
                        queue.push_back(d.clone());
                    }
                }
            }
        }
        let mut weight = 0u128;
        for candidate in &candidates {
            if self.resolve(candidate).as_ref() == Some(member) {
                weight = weight.saturating_add(calc.power(candidate));
            }
        }
        weight
    }

    /// The weight this member's own ballot carries: their power plus all
    /// delegated power, or zero while they have delegated away.
    pub fn vote_weight(&self, member: &MemberAddress, calc: &PowerCalculator) -> u128 {
        if self.has_delegated(member) {
            return 0;
        }
        calc.power(member)
            .saturating_add(self.delegated_weight(member, calc))
    }

    /// Get the direct delegatee for a member (None if not delegated).
    pub fn get_delegatee(&self, delegator: &MemberAddress) -> Option<&MemberAddress> {
        self.delegations.get(delegator)
    }
}

/// Meta-store key used for persisting the delegation register state.
const DELEGATION_REGISTER_META_KEY: &str = "delegation_register_state";

/// Serializable snapshot of the in-memory delegation graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DelegationSnapshot {
    pub delegations: HashMap<MemberAddress, MemberAddress>,
    pub max_depth: usize,
}

impl DelegationRegister {
    /// Serialize the delegation graph to bytes for persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = DelegationSnapshot {
            delegations: self.delegations.clone(),
            max_depth: self.max_depth,
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore the delegation graph from serialized bytes.
    pub fn load_state(data: &[u8]) -> Self {
        match bincode::deserialize::<DelegationSnapshot>(data) {
            Ok(snapshot) => {
                let mut reverse = HashMap::<MemberAddress, HashSet<MemberAddress>>::new();
                for (from, to) in &snapshot.delegations {
                    reverse.entry(to.clone()).or_default().insert(from.clone());
                }
                Self {
                    delegations: snapshot.delegations,
                    reverse_delegations: reverse,
                    max_depth: snapshot.max_depth,
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// The meta-store key used for delegation persistence.
    pub fn meta_key() -> &'static str {
        DELEGATION_REGISTER_META_KEY
    }
}

impl Default for DelegationRegister {
    fn default() -> Self {
        Self::new(10)
    }
}
