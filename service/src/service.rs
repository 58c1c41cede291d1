//! The tribunal service proper.
//!
//! Owns the four engines and the stores, executes settlement effects, and
//! serializes operations per key. Engine mutexes are always taken in the
//! order cases → oracles → delegations → calculator → ledger → volume; no
//! operation takes them in any other order, so the service cannot deadlock
//! on itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use tribunal_ledger::RewardLedger;
use tribunal_messages::{InboundMessage, ResultTransport, SettlementNotice, VoterShare};
use tribunal_oracle::{OracleRegistry, OracleStatus};
use tribunal_power::{DelegationRegister, PowerCalculator};
use tribunal_registry::{Escrow, ProfileRegistry, StakeRegistry};
use tribunal_rewards::{BandSchedule, PaymentRewards, RewardCalculator};
use tribunal_store::{CaseStore, MetaStore, OracleStore, RewardStore};
use tribunal_types::{
    CaseId, CaseKind, CurrencyAmount, LedgerParams, MemberAddress, SubjectId, Timestamp,
    TokenAmount, VoteDirection,
};
use tribunal_utils::StatsCounter;
use tribunal_voting::{Case, CaseEngine, FundsInstruction, SettlementOutcome};

use crate::error::ServiceError;
use crate::locks::{hold, KeyedLocks};

/// Meta key for the last cumulative platform volume the service has seen.
const VOLUME_META_KEY: &str = "cumulative_volume";

/// Operation counter names, in the order they appear in log summaries.
const OP_COUNTERS: &[&str] = &[
    "cases_created",
    "votes_cast",
    "cases_settled",
    "payments_processed",
    "governance_actions",
    "claims_paid",
    "inbound_messages",
];

/// Handles to the platform contracts around the ledger. Any of them may be
/// absent; reads then degrade to zero/none and writes become reported
/// effect failures.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub stakes: Option<Arc<dyn StakeRegistry + Send + Sync>>,
    pub escrow: Option<Arc<dyn Escrow + Send + Sync>>,
    pub profiles: Option<Arc<dyn ProfileRegistry + Send + Sync>>,
    pub transport: Option<Arc<dyn ResultTransport + Send + Sync>>,
}

impl Collaborators {
    /// No collaborators at all. Voting power is zero everywhere, no fees
    /// move, nothing is relayed. Mostly useful in tests.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Storage handles, one per engine plus shared metadata.
#[derive(Clone)]
pub struct Stores {
    pub cases: Arc<dyn CaseStore + Send + Sync>,
    pub oracles: Arc<dyn OracleStore + Send + Sync>,
    pub rewards: Arc<dyn RewardStore + Send + Sync>,
    pub meta: Arc<dyn MetaStore + Send + Sync>,
}

/// What a settlement did, including anything that went wrong *after* the
/// case finalized.
///
/// Finalization commits before effects run, so an escrow or transport
/// failure never unwinds the outcome; it lands in `effect_errors` for the
/// caller to retry out of band.
#[derive(Clone, Debug)]
pub struct SettlementReport {
    pub outcome: SettlementOutcome,
    pub notice: SettlementNotice,
    pub effect_errors: Vec<String>,
}

/// The assembled ledger: engines, stores, collaborators, per-key locks.
pub struct TribunalService {
    params: LedgerParams,

    cases: Mutex<CaseEngine>,
    oracles: Mutex<OracleRegistry>,
    delegations: Mutex<DelegationRegister>,
    calculator: Mutex<RewardCalculator>,
    ledger: Mutex<RewardLedger>,
    /// Last cumulative platform volume seen, used to pick the band that
    /// governance actions are credited under. Never moves backwards.
    volume: Mutex<CurrencyAmount>,

    power: PowerCalculator,
    escrow: Option<Arc<dyn Escrow + Send + Sync>>,
    transport: Option<Arc<dyn ResultTransport + Send + Sync>>,

    stores: Stores,
    case_locks: KeyedLocks,
    member_locks: KeyedLocks,
    stats: StatsCounter,
}

impl TribunalService {
    /// Assemble the service, restoring engine state from the stores.
    ///
    /// A fresh store yields empty engines; a store written by a previous
    /// process yields exactly the state it had at its last operation.
    pub fn open(
        params: LedgerParams,
        schedule: BandSchedule,
        stores: Stores,
        collaborators: Collaborators,
    ) -> Result<Self, ServiceError> {
        let cases = CaseEngine::load_from_store(stores.cases.as_ref())?;
        let oracles = OracleRegistry::load_from_store(stores.oracles.as_ref(), &params)?;
        let ledger = RewardLedger::load_from_store(stores.rewards.as_ref())?;
        let delegations = match stores.meta.get_meta(DelegationRegister::meta_key())? {
            Some(bytes) => DelegationRegister::load_state(&bytes),
            None => DelegationRegister::default(),
        };
        let volume = match stores.meta.get_meta(VOLUME_META_KEY)? {
            Some(bytes) => CurrencyAmount::new(decode_volume(&bytes)?),
            None => CurrencyAmount::ZERO,
        };

        let power = PowerCalculator::new(
            &params,
            collaborators.stakes.clone(),
            collaborators.escrow.clone(),
        );
        let calculator =
            RewardCalculator::new(schedule, &params, collaborators.profiles.clone());

        info!(
            cases = cases.cases().count(),
            volume = %volume,
            "tribunal service opened"
        );

        Ok(Self {
            params,
            cases: Mutex::new(cases),
            oracles: Mutex::new(oracles),
            delegations: Mutex::new(delegations),
            calculator: Mutex::new(calculator),
            ledger: Mutex::new(ledger),
            volume: Mutex::new(volume),
            power,
            escrow: collaborators.escrow,
            transport: collaborators.transport,
            stores,
            case_locks: KeyedLocks::new(),
            member_locks: KeyedLocks::new(),
            stats: StatsCounter::new(OP_COUNTERS),
        })
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// Current operation counters.
    pub fn stats(&self) -> HashMap<&'static str, u64> {
        self.stats.snapshot()
    }

    // ── Oracle administration ──────────────────────────────────────────

    pub fn add_oracle(&self, name: &str, now: Timestamp) -> Result<(), ServiceError> {
        let mut oracles = self.lock_oracles();
        oracles.add_oracle(name, now)?;
        self.persist_oracles(&oracles)?;
        info!(oracle = name, "oracle added");
        Ok(())
    }

    pub fn add_oracle_member(
        &self,
        name: &str,
        member: &MemberAddress,
        now: Timestamp,
    ) -> Result<(), ServiceError> {
        self.check_address(member)?;
        let mut oracles = self.lock_oracles();
        oracles.add_member(name, member.clone(), now)?;
        self.persist_oracles(&oracles)?;
        debug!(oracle = name, member = %member, "oracle member added");
        Ok(())
    }

    pub fn remove_oracle_member(
        &self,
        name: &str,
        member: &MemberAddress,
        now: Timestamp,
    ) -> Result<(), ServiceError> {
        let mut oracles = self.lock_oracles();
        oracles.remove_member(name, member, now)?;
        self.persist_oracles(&oracles)?;
        debug!(oracle = name, member = %member, "oracle member removed");
        Ok(())
    }

    /// Recompute and cache an oracle's activity status. Unprivileged but
    /// O(members); callers are expected to rate-limit themselves.
    pub fn refresh_oracle_status(
        &self,
        name: &str,
        now: Timestamp,
    ) -> Result<OracleStatus, ServiceError> {
        let mut oracles = self.lock_oracles();
        let status = oracles.refresh_status(name, now)?;
        self.persist_oracles(&oracles)?;
        info!(
            oracle = name,
            active = status.is_active,
            active_members = status.active_members,
            "oracle status refreshed"
        );
        Ok(status)
    }

    pub fn oracle_is_active(&self, name: &str) -> bool {
        self.lock_oracles().is_active(name)
    }

    /// Change the activity threshold, bounded to 30–180 days. Cached
    /// statuses keep whatever threshold they were computed with.
    pub fn set_activity_threshold(&self, days: u64) -> Result<(), ServiceError> {
        let mut oracles = self.lock_oracles();
        oracles.set_activity_threshold(days)?;
        self.persist_oracles(&oracles)?;
        info!(days, "oracle activity threshold changed");
        Ok(())
    }

    // ── Delegation ─────────────────────────────────────────────────────

    pub fn delegate(
        &self,
        from: &MemberAddress,
        to: &MemberAddress,
    ) -> Result<(), ServiceError> {
        self.check_address(from)?;
        self.check_address(to)?;
        let mut delegations = self.lock_delegations();
        delegations.delegate(from, to)?;
        self.persist_delegations(&delegations)?;
        debug!(from = %from, to = %to, "delegation set");
        Ok(())
    }

    pub fn undelegate(&self, from: &MemberAddress) -> Result<(), ServiceError> {
        let mut delegations = self.lock_delegations();
        delegations.undelegate(from);
        self.persist_delegations(&delegations)?;
        debug!(from = %from, "delegation removed");
        Ok(())
    }

    // ── Case lifecycle ─────────────────────────────────────────────────

    /// Open a case. Serialized per subject so concurrent filings about the
    /// same job get distinct sequence numbers.
    #[allow(clippy::too_many_arguments)]
    pub fn create_case(
        &self,
        subject: &SubjectId,
        kind: CaseKind,
        oracle: &str,
        evidence: &str,
        fee: CurrencyAmount,
        disputed_amount: CurrencyAmount,
        raiser: &MemberAddress,
        now: Timestamp,
    ) -> Result<CaseId, ServiceError> {
        let key = self.case_locks.lock_for(subject.as_str());
        let _guard = hold(&key);

        let mut cases = self.lock_cases();
        let oracles = self.lock_oracles();
        let id = cases.create(
            subject,
            kind,
            oracle,
            evidence,
            fee,
            disputed_amount,
            raiser,
            &oracles,
            now,
        )?;
        drop(oracles);
        self.persist_cases(&cases)?;

        self.stats.increment("cases_created");
        info!(case = %id, %kind, oracle, fee = %fee, raiser = %raiser, "case created");
        Ok(id)
    }

    pub fn case(&self, id: &CaseId) -> Option<Case> {
        self.lock_cases().case(id).cloned()
    }

    /// Cast a weighted vote, stamp the voter's oracle participation, and
    /// count the vote as a governance action.
    ///
    /// Returns the weight frozen into the vote record.
    pub fn cast_vote(
        &self,
        case_id: &CaseId,
        direction: VoteDirection,
        claim_address: &MemberAddress,
        voter: &MemberAddress,
        now: Timestamp,
    ) -> Result<u128, ServiceError> {
        self.check_address(voter)?;
        self.check_address(claim_address)?;
        let key = self.case_locks.lock_for(case_id.as_str());
        let _guard = hold(&key);

        let weight = {
            let mut cases = self.lock_cases();
            let delegations = self.lock_delegations();
            let weight = cases.cast_vote(
                case_id,
                direction,
                claim_address,
                voter,
                &self.power,
                &delegations,
                &self.params,
                now,
            )?;
            drop(delegations);
            self.persist_cases(&cases)?;
            weight
        };

        {
            let mut oracles = self.lock_oracles();
            if oracles.record_participation(voter, now) > 0 {
                self.persist_oracles(&oracles)?;
            }
        }

        // A vote is itself a qualifying governance action.
        self.record_governance_action(voter)?;

        self.stats.increment("votes_cast");
        debug!(case = %case_id, voter = %voter, weight, ?direction, "vote cast");
        Ok(weight)
    }

    /// Settle a case whose window has elapsed, then execute the outcome's
    /// instructions: escrow release or fee refund, oracle admission for an
    /// approved applicant, and the settlement relay to the origin chain.
    pub fn settle_case(
        &self,
        case_id: &CaseId,
        now: Timestamp,
    ) -> Result<SettlementReport, ServiceError> {
        let key = self.case_locks.lock_for(case_id.as_str());
        let _guard = hold(&key);

        let outcome = {
            let mut cases = self.lock_cases();
            let outcome = cases.settle(case_id, &self.params, now)?;
            self.persist_cases(&cases)?;
            outcome
        };

        // The case is finalized and persisted; from here on, failures are
        // reported, never propagated as operation errors.
        let mut effect_errors = Vec::new();
        self.apply_funds_instruction(&outcome, &mut effect_errors);
        self.admit_approved_applicant(&outcome, now, &mut effect_errors);

        let notice = build_notice(&outcome, now);
        if let Some(transport) = &self.transport {
            if let Err(e) = transport.relay_settlement(&notice) {
                warn!(case = %case_id, error = %e, "settlement relay failed");
                effect_errors.push(format!("relay: {e}"));
            }
        }

        self.stats.increment("cases_settled");
        info!(
            case = %case_id,
            winner = %outcome.winning_side,
            votes_for = outcome.votes_for,
            votes_against = outcome.votes_against,
            effect_errors = effect_errors.len(),
            "case settled"
        );
        Ok(SettlementReport {
            outcome,
            notice,
            effect_errors,
        })
    }

    // ── Payments and rewards ───────────────────────────────────────────

    /// Record a platform payment: price every share through the band
    /// schedule and credit each recipient's earned tokens under the
    /// post-payment band.
    ///
    /// `new_cumulative_total` is the platform volume *after* this payment,
    /// as reported by the escrow contract that processed it.
    pub fn process_payment(
        &self,
        payer: &MemberAddress,
        payee: &MemberAddress,
        amount: CurrencyAmount,
        new_cumulative_total: CurrencyAmount,
    ) -> Result<PaymentRewards, ServiceError> {
        self.check_address(payer)?;
        self.check_address(payee)?;

        let rewards = {
            let calculator = self.lock_calculator();
            calculator.payment_rewards(payer, payee, amount, new_cumulative_total)?
        };

        for share in &rewards.shares {
            let key = self.member_locks.lock_for(share.recipient.as_str());
            let _guard = hold(&key);
            let mut ledger = self.lock_ledger();
            ledger.record_earning(&share.recipient, rewards.band, share.tokens)?;
        }
        self.persist_ledger(&self.lock_ledger())?;
        self.advance_volume(new_cumulative_total)?;

        self.stats.increment("payments_processed");
        info!(
            payer = %payer,
            payee = %payee,
            amount = %amount,
            band = rewards.band,
            shares = rewards.shares.len(),
            "payment processed"
        );
        Ok(rewards)
    }

    /// Count one qualifying governance action for a member, under the band
    /// of the current platform volume, and mirror it to the escrow
    /// contract best-effort.
    pub fn record_governance_action(&self, member: &MemberAddress) -> Result<(), ServiceError> {
        self.check_address(member)?;
        let key = self.member_locks.lock_for(member.as_str());
        let _guard = hold(&key);

        let band = {
            let volume = *self.lock_volume();
            self.lock_calculator().schedule().current_band(volume.raw())
        };
        {
            let mut ledger = self.lock_ledger();
            ledger.record_governance_action(member, band)?;
            self.persist_ledger(&ledger)?;
        }

        if let Some(escrow) = &self.escrow {
            if let Err(e) = escrow.increment_governance_action(member) {
                warn!(member = %member, error = %e, "escrow governance-action notify failed");
            }
        }

        self.stats.increment("governance_actions");
        debug!(member = %member, band, "governance action recorded");
        Ok(())
    }

    /// Tokens the member could withdraw right now.
    pub fn claimable_of(&self, member: &MemberAddress) -> Result<TokenAmount, ServiceError> {
        let calculator = self.lock_calculator();
        let ledger = self.lock_ledger();
        Ok(ledger.claimable_of(member, calculator.schedule())?)
    }

    /// Consume `amount` of the member's claimable tokens. Rejected without
    /// mutation when it exceeds the claimable total.
    pub fn claim(&self, member: &MemberAddress, amount: TokenAmount) -> Result<(), ServiceError> {
        self.check_address(member)?;
        let key = self.member_locks.lock_for(member.as_str());
        let _guard = hold(&key);

        let calculator = self.lock_calculator();
        let mut ledger = self.lock_ledger();
        ledger.mark_claimed(member, amount, calculator.schedule())?;
        self.persist_ledger(&ledger)?;

        self.stats.increment("claims_paid");
        info!(member = %member, amount = %amount, "claim paid");
        Ok(())
    }

    /// Swap in a new governed band schedule. Already-recorded earnings keep
    /// their band indices; only future pricing and unlock rates change.
    pub fn set_schedule(&self, schedule: BandSchedule) {
        self.lock_calculator().set_schedule(schedule);
        info!("band schedule replaced");
    }

    // ── Cross-chain intake ─────────────────────────────────────────────

    /// Apply a message delivered by the transport layer. Addresses inside
    /// arrive unvalidated and are checked here.
    pub fn apply_inbound(
        &self,
        message: InboundMessage,
        now: Timestamp,
    ) -> Result<Option<CaseId>, ServiceError> {
        self.stats.increment("inbound_messages");
        match message {
            InboundMessage::CreateCase {
                subject,
                kind,
                oracle,
                evidence,
                fee,
                disputed_amount,
                raiser,
            } => {
                let id = self.create_case(
                    &subject,
                    kind,
                    &oracle,
                    &evidence,
                    fee,
                    disputed_amount,
                    &raiser,
                    now,
                )?;
                Ok(Some(id))
            }
            InboundMessage::GovernanceAction { member } => {
                self.record_governance_action(&member)?;
                Ok(None)
            }
        }
    }

    // ── Internal ───────────────────────────────────────────────────────

    fn check_address(&self, address: &MemberAddress) -> Result<(), ServiceError> {
        if address.is_valid() {
            Ok(())
        } else {
            Err(ServiceError::InvalidAddress(address.to_string()))
        }
    }

    fn apply_funds_instruction(&self, outcome: &SettlementOutcome, errors: &mut Vec<String>) {
        let result = match (&outcome.funds, &self.escrow) {
            (FundsInstruction::None, _) => return,
            (_, None) => Err("escrow not configured".to_string()),
            (FundsInstruction::Release { side }, Some(escrow)) => escrow
                .release_disputed_funds(&outcome.subject, *side)
                .map_err(|e| e.to_string()),
            (FundsInstruction::RefundFee { to, amount }, Some(escrow)) => escrow
                .refund_fee(&outcome.subject, to, *amount)
                .map_err(|e| e.to_string()),
        };
        if let Err(e) = result {
            warn!(case = %outcome.case_id, error = %e, "escrow instruction failed");
            errors.push(format!("escrow: {e}"));
        }
    }

    fn admit_approved_applicant(
        &self,
        outcome: &SettlementOutcome,
        now: Timestamp,
        errors: &mut Vec<String>,
    ) {
        let Some(applicant) = &outcome.new_oracle_member else {
            return;
        };
        let mut oracles = self.lock_oracles();
        match oracles.add_member(&outcome.oracle, applicant.clone(), now) {
            Ok(()) => {
                if let Err(e) = self.persist_oracles(&oracles) {
                    errors.push(format!("oracle persist: {e}"));
                }
                info!(oracle = %outcome.oracle, member = %applicant, "applicant admitted");
            }
            // Already a member: the application was redundant, not wrong.
            Err(tribunal_oracle::OracleError::AlreadyMember { .. }) => {}
            Err(e) => {
                warn!(case = %outcome.case_id, error = %e, "oracle admission failed");
                errors.push(format!("oracle: {e}"));
            }
        }
    }

    /// Move the volume watermark forward and persist it. A total below the
    /// watermark (a replayed or late message) leaves it untouched.
    fn advance_volume(&self, new_total: CurrencyAmount) -> Result<(), ServiceError> {
        let mut volume = self.lock_volume();
        if new_total > *volume {
            *volume = new_total;
            self.stores
                .meta
                .put_meta(VOLUME_META_KEY, &new_total.raw().to_le_bytes())?;
        }
        Ok(())
    }

    fn persist_cases(&self, engine: &CaseEngine) -> Result<(), ServiceError> {
        engine.save_to_store(self.stores.cases.as_ref())?;
        Ok(())
    }

    fn persist_oracles(&self, registry: &OracleRegistry) -> Result<(), ServiceError> {
        registry.save_to_store(self.stores.oracles.as_ref())?;
        Ok(())
    }

    fn persist_ledger(&self, ledger: &RewardLedger) -> Result<(), ServiceError> {
        ledger.save_to_store(self.stores.rewards.as_ref())?;
        Ok(())
    }

    fn persist_delegations(&self, register: &DelegationRegister) -> Result<(), ServiceError> {
        self.stores
            .meta
            .put_meta(DelegationRegister::meta_key(), &register.save_state())?;
        Ok(())
    }

    fn lock_cases(&self) -> std::sync::MutexGuard<'_, CaseEngine> {
        self.cases.lock().expect("case engine lock poisoned")
    }

    fn lock_oracles(&self) -> std::sync::MutexGuard<'_, OracleRegistry> {
        self.oracles.lock().expect("oracle registry lock poisoned")
    }

    fn lock_delegations(&self) -> std::sync::MutexGuard<'_, DelegationRegister> {
        self.delegations
            .lock()
            .expect("delegation register lock poisoned")
    }

    fn lock_calculator(&self) -> std::sync::MutexGuard<'_, RewardCalculator> {
        self.calculator
            .lock()
            .expect("reward calculator lock poisoned")
    }

    fn lock_ledger(&self) -> std::sync::MutexGuard<'_, RewardLedger> {
        self.ledger.lock().expect("reward ledger lock poisoned")
    }

    fn lock_volume(&self) -> std::sync::MutexGuard<'_, CurrencyAmount> {
        self.volume.lock().expect("volume watermark lock poisoned")
    }
}

fn build_notice(outcome: &SettlementOutcome, now: Timestamp) -> SettlementNotice {
    let fee_refunded = match &outcome.funds {
        FundsInstruction::RefundFee { amount, .. } => Some(*amount),
        _ => None,
    };
    SettlementNotice {
        case_id: outcome.case_id.clone(),
        subject: outcome.subject.clone(),
        kind: outcome.kind,
        winning_side: outcome.winning_side,
        votes_for: outcome.votes_for,
        votes_against: outcome.votes_against,
        shares: outcome
            .fee_shares
            .iter()
            .map(|s| VoterShare {
                claim_address: s.claim_address.clone(),
                amount: s.amount,
            })
            .collect(),
        fee_refunded,
        settled_at: now,
    }
}

fn decode_volume(bytes: &[u8]) -> Result<u128, ServiceError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        ServiceError::Store(tribunal_store::StoreError::Corruption(
            "cumulative_volume has unexpected byte length".to_string(),
        ))
    })?;
    Ok(u128::from_le_bytes(arr))
}
