//! Case engine — creation, weighted voting, and settlement for disputes,
//! skill-verification applications, and advisory questions.

use crate::case::{Case, VoteRecord};
use crate::distribution::{distribute_fee, FeeShare};
use crate::error::CaseError;
use std::collections::HashMap;
use tribunal_oracle::OracleRegistry;
use tribunal_power::{DelegationRegister, PowerCalculator};
use tribunal_types::{
    CaseId, CaseKind, CurrencyAmount, LedgerParams, MemberAddress, SubjectId, Timestamp,
    VoteDirection, WinningSide,
};

const SEQUENCES_META_KEY: &[u8] = b"subject_sequences";

/// What settlement decided and what the caller must now do about it.
///
/// The engine only records state and computes; escrow releases, refunds,
/// oracle membership changes, and result relaying are executed by the
/// service layer from this outcome.
#[derive(Clone, Debug)]
pub struct SettlementOutcome {
    pub case_id: CaseId,
    pub subject: SubjectId,
    pub kind: CaseKind,
    pub oracle: String,
    pub winning_side: WinningSide,
    pub votes_for: u128,
    pub votes_against: u128,
    /// Fee pool cuts for the winning voters. Empty on the zero-vote path.
    pub fee_shares: Vec<FeeShare>,
    pub funds: FundsInstruction,
    /// Approved skill-verification applicant to add to the oracle.
    pub new_oracle_member: Option<MemberAddress>,
}

/// Escrow movement requested by a settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FundsInstruction {
    /// Release the disputed funds to the winning side.
    Release { side: WinningSide },
    /// Return the whole fee pool to the raiser. Taken when a case closes
    /// with zero votes, so the fee is not handed to nobody.
    RefundFee {
        to: MemberAddress,
        amount: CurrencyAmount,
    },
    /// No funds move (advisory questions, rejected applications).
    None,
}

/// Owns every case and its lifecycle. Eligibility, weight, and oracle
/// activity come from collaborator engines passed per call; this engine
/// performs no I/O of its own.
pub struct CaseEngine {
    cases: HashMap<CaseId, Case>,
    /// Next sequence number per subject, so repeat cases about the same
    /// job or applicant get distinct ids.
    sequences: HashMap<SubjectId, u64>,
}

impl CaseEngine {
    pub fn new() -> Self {
        Self {
            cases: HashMap::new(),
            sequences: HashMap::new(),
        }
    }

    pub fn case(&self, id: &CaseId) -> Option<&Case> {
        self.cases.get(id)
    }

    pub fn cases(&self) -> impl Iterator<Item = &Case> {
        self.cases.values()
    }

    /// Open a new case against an active oracle.
    ///
    /// The id is derived from the subject and a per-subject sequence
    /// number, so it is reproducible from public state.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        subject: &SubjectId,
        kind: CaseKind,
        oracle: &str,
        evidence: &str,
        fee: CurrencyAmount,
        disputed_amount: CurrencyAmount,
        raiser: &MemberAddress,
        oracles: &OracleRegistry,
        now: Timestamp,
    ) -> Result<CaseId, CaseError> {
        if !oracles.is_active(oracle) {
            return Err(CaseError::OracleInactive(oracle.to_string()));
        }
        if !raiser.is_valid() {
            return Err(CaseError::InvalidRaiser(raiser.to_string()));
        }

        let seq = self.sequences.entry(subject.clone()).or_insert(0);
        let id = CaseId::derive(subject, *seq);
        *seq += 1;

        self.cases.insert(
            id.clone(),
            Case {
                id: id.clone(),
                subject: subject.clone(),
                kind,
                oracle: oracle.to_string(),
                evidence: evidence.to_string(),
                fee,
                disputed_amount,
                raiser: raiser.clone(),
                created_at: now,
                votes: Vec::new(),
                votes_for: 0,
                votes_against: 0,
                finalized: false,
                winning_side: None,
            },
        );
        Ok(id)
    }

    /// Cast a weighted vote. Weight is the voter's effective power at cast
    /// time (own power plus delegated weight; zero for members who have
    /// delegated away), frozen into the record.
    ///
    /// Returns the recorded weight so the caller can log participation.
    pub fn cast_vote(
        &mut self,
        case_id: &CaseId,
        direction: VoteDirection,
        claim_address: &MemberAddress,
        voter: &MemberAddress,
        power: &PowerCalculator,
        delegations: &DelegationRegister,
        params: &LedgerParams,
        now: Timestamp,
    ) -> Result<u128, CaseError> {
        let case = self
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::CaseNotFound(case_id.to_string()))?;

        if case.finalized {
            return Err(CaseError::AlreadyFinalized(case_id.to_string()));
        }
        if !case.voting_open(params.voting_period_secs, now) {
            return Err(CaseError::VotingClosed(case_id.to_string()));
        }
        if !power.eligible(voter) {
            return Err(CaseError::NotEligible(voter.to_string()));
        }
        if case.has_voted(voter) {
            return Err(CaseError::AlreadyVoted {
                case: case_id.to_string(),
                voter: voter.to_string(),
            });
        }
        if !claim_address.is_valid() {
            return Err(CaseError::InvalidClaimAddress(claim_address.to_string()));
        }

        let weight = delegations.vote_weight(voter, power);
        if weight == 0 {
            return Err(CaseError::ZeroVoteWeight(voter.to_string()));
        }

        // Compute the new counter before touching anything, so a rejected
        // vote leaves no partial effect.
        let new_total = match direction {
            VoteDirection::For => case.votes_for,
            VoteDirection::Against => case.votes_against,
        }
        .checked_add(weight)
        .ok_or(CaseError::Overflow)?;

        case.votes.push(VoteRecord {
            voter: voter.clone(),
            claim_address: claim_address.clone(),
            direction,
            weight,
            cast_at: now,
        });
        match direction {
            VoteDirection::For => case.votes_for = new_total,
            VoteDirection::Against => case.votes_against = new_total,
        }
        Ok(weight)
    }

    /// Settle a case whose voting window has elapsed.
    ///
    /// The raiser wins only on a strict majority; a tie is a loss for them.
    /// A case with no votes at all closes through the fee-refund path
    /// instead of distribution. Finalization happens exactly once: a
    /// second call is rejected before it can touch anything.
    pub fn settle(
        &mut self,
        case_id: &CaseId,
        params: &LedgerParams,
        now: Timestamp,
    ) -> Result<SettlementOutcome, CaseError> {
        let case = self
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::CaseNotFound(case_id.to_string()))?;

        if case.finalized {
            return Err(CaseError::AlreadyFinalized(case_id.to_string()));
        }
        if case.voting_open(params.voting_period_secs, now) {
            let closes_at = case
                .created_at
                .as_secs()
                .saturating_add(params.voting_period_secs);
            return Err(CaseError::VotingStillOpen {
                case: case_id.to_string(),
                remaining_secs: closes_at.saturating_sub(now.as_secs()),
            });
        }

        let winning_side = if case.votes_for > case.votes_against {
            WinningSide::Raiser
        } else {
            WinningSide::Counterparty
        };

        let (fee_shares, funds, new_oracle_member) = if case.total_votes() == 0 {
            let refund = FundsInstruction::RefundFee {
                to: case.raiser.clone(),
                amount: case.fee,
            };
            (Vec::new(), refund, None)
        } else {
            let winners = case.voters_on(winning_side);
            let shares = distribute_fee(case_id.as_str(), case.fee, &winners)?;
            let funds = match case.kind {
                CaseKind::Dispute => FundsInstruction::Release { side: winning_side },
                CaseKind::SkillVerification | CaseKind::Advisory => FundsInstruction::None,
            };
            let applicant = (case.kind == CaseKind::SkillVerification
                && winning_side == WinningSide::Raiser)
                .then(|| case.raiser.clone());
            (shares, funds, applicant)
        };

        case.finalized = true;
        case.winning_side = Some(winning_side);

        Ok(SettlementOutcome {
            case_id: case_id.clone(),
            subject: case.subject.clone(),
            kind: case.kind,
            oracle: case.oracle.clone(),
            winning_side,
            votes_for: case.votes_for,
            votes_against: case.votes_against,
            fee_shares,
            funds,
            new_oracle_member,
        })
    }
}

impl CaseEngine {
    /// Persist every case and the sequence counters.
    pub fn save_to_store(&self, store: &dyn tribunal_store::CaseStore) -> Result<(), CaseError> {
        for (id, case) in &self.cases {
            let bytes = bincode::serialize(case).map_err(|e| CaseError::Store(e.to_string()))?;
            store
                .put_case(id, &bytes)
                .map_err(|e| CaseError::Store(e.to_string()))?;
        }
        let seqs =
            bincode::serialize(&self.sequences).map_err(|e| CaseError::Store(e.to_string()))?;
        store
            .put_meta(SEQUENCES_META_KEY, &seqs)
            .map_err(|e| CaseError::Store(e.to_string()))?;
        Ok(())
    }

    /// Restore engine state from a case store.
    pub fn load_from_store(store: &dyn tribunal_store::CaseStore) -> Result<Self, CaseError> {
        let mut cases = HashMap::new();
        for (id, bytes) in store
            .iter_cases()
            .map_err(|e| CaseError::Store(e.to_string()))?
        {
            let case: Case =
                bincode::deserialize(&bytes).map_err(|e| CaseError::Store(e.to_string()))?;
            cases.insert(id, case);
        }
        let sequences = match store
            .get_meta(SEQUENCES_META_KEY)
            .map_err(|e| CaseError::Store(e.to_string()))?
        {
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|e| CaseError::Store(e.to_string()))?
            }
            None => HashMap::new(),
        };
        Ok(Self { cases, sequences })
    }
}

impl Default for CaseEngine {
    fn default() -> Self {
        Self::new()
    }
}
