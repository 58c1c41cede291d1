//! Integration tests exercising the assembled service:
//! oracle setup → case creation → weighted voting → settlement →
//! escrow effects → result relay, plus the payment/claim path and
//! persistence across a restart.

use std::sync::Arc;

use tribunal_messages::InboundMessage;
use tribunal_nullables::{NullEscrow, NullProfiles, NullStakeRegistry, NullStore, NullTransport};
use tribunal_registry::StakeInfo;
use tribunal_rewards::BandSchedule;
use tribunal_service::{Collaborators, Stores, TribunalService};
use tribunal_types::{
    CaseKind, CurrencyAmount, LedgerParams, MemberAddress, SubjectId, Timestamp, TokenAmount,
    VoteDirection, WinningSide,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const T0: u64 = 1_700_000_000;

fn member(name: &str) -> MemberAddress {
    MemberAddress::new(name)
}

fn subject(name: &str) -> SubjectId {
    SubjectId::new(name)
}

fn at(secs_after_t0: u64) -> Timestamp {
    Timestamp::new(T0 + secs_after_t0)
}

struct Fixture {
    stakes: Arc<NullStakeRegistry>,
    escrow: Arc<NullEscrow>,
    profiles: Arc<NullProfiles>,
    transport: Arc<NullTransport>,
    store: Arc<NullStore>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            stakes: Arc::new(NullStakeRegistry::new()),
            escrow: Arc::new(NullEscrow::new()),
            profiles: Arc::new(NullProfiles::new()),
            transport: Arc::new(NullTransport::new()),
            store: Arc::new(NullStore::new()),
        }
    }

    fn stores(&self) -> Stores {
        Stores {
            cases: self.store.clone(),
            oracles: self.store.clone(),
            rewards: self.store.clone(),
            meta: self.store.clone(),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            stakes: Some(self.stakes.clone()),
            escrow: Some(self.escrow.clone()),
            profiles: Some(self.profiles.clone()),
            transport: Some(self.transport.clone()),
        }
    }

    fn open(&self) -> TribunalService {
        TribunalService::open(
            LedgerParams::tribunal_defaults(),
            BandSchedule::tribunal_defaults(),
            self.stores(),
            self.collaborators(),
        )
        .expect("service opens")
    }

    /// Stake `amount` for one minute, so voting weight equals `amount`.
    fn stake(&self, who: &MemberAddress, amount: u128) {
        self.stakes.set_stake(
            who.clone(),
            StakeInfo {
                amount,
                unlock_time: Timestamp::new(T0 + 365 * 24 * 3600),
                duration_minutes: 1,
                is_active: true,
            },
        );
    }
}

/// An oracle with three staked members, refreshed to active.
fn active_oracle(fx: &Fixture, service: &TribunalService, name: &str) -> Vec<MemberAddress> {
    let members: Vec<MemberAddress> = (0..3).map(|n| member(&format!("juror-{n}"))).collect();
    service.add_oracle(name, at(0)).expect("oracle added");
    for m in &members {
        fx.stake(m, 50_000);
        service.add_oracle_member(name, m, at(0)).expect("member added");
    }
    let status = service.refresh_oracle_status(name, at(0)).expect("refresh");
    assert!(status.is_active);
    members
}

fn voting_period() -> u64 {
    LedgerParams::tribunal_defaults().voting_period_secs
}

// ---------------------------------------------------------------------------
// Dispute lifecycle
// ---------------------------------------------------------------------------

#[test]
fn dispute_lifecycle_majority_for_raiser() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");

    // Voters weighted 50k/15k/10k for, 25k against.
    let (a, b, c, d) = (member("a"), member("b"), member("c"), member("d"));
    fx.stake(&a, 50_000);
    fx.stake(&b, 15_000);
    fx.stake(&c, 10_000);
    fx.stake(&d, 25_000);

    let raiser = member("freelancer");
    let id = service
        .create_case(
            &subject("job-77"),
            CaseKind::Dispute,
            "rust-dev",
            "QmEvidence",
            CurrencyAmount::new(100),
            CurrencyAmount::new(5_000),
            &raiser,
            at(10),
        )
        .expect("case created");
    assert_eq!(id.as_str(), "job-77-0");

    for (voter, dir) in [
        (&a, VoteDirection::For),
        (&b, VoteDirection::For),
        (&c, VoteDirection::For),
        (&d, VoteDirection::Against),
    ] {
        service
            .cast_vote(&id, dir, voter, voter, at(100))
            .expect("vote accepted");
    }

    let report = service
        .settle_case(&id, at(10 + voting_period()))
        .expect("settles");
    assert!(report.effect_errors.is_empty());
    assert_eq!(report.outcome.winning_side, WinningSide::Raiser);
    assert_eq!(report.outcome.votes_for, 75_000);
    assert_eq!(report.outcome.votes_against, 25_000);

    // floor(100 × w / 75000) per winner; the 1-unit remainder stays in the
    // pool.
    let amounts: Vec<u128> = report
        .outcome
        .fee_shares
        .iter()
        .map(|s| s.amount.raw())
        .collect();
    assert_eq!(amounts, vec![66, 20, 13]);

    // Escrow released the disputed funds to the raiser side.
    assert_eq!(
        fx.escrow.released(),
        vec![(subject("job-77"), WinningSide::Raiser)]
    );
    assert!(fx.escrow.refunded().is_empty());

    // The result was relayed to the origin chain.
    let sent = fx.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].case_id, id);
    assert_eq!(sent[0].shares.len(), 3);
    assert_eq!(sent[0].fee_refunded, None);
}

#[test]
fn second_settlement_is_rejected_and_moves_nothing() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let id = service
        .create_case(
            &subject("job-1"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(100),
            CurrencyAmount::new(1_000),
            &member("raiser"),
            at(0),
        )
        .unwrap();
    service
        .cast_vote(&id, VoteDirection::For, &a, &a, at(50))
        .unwrap();

    service.settle_case(&id, at(voting_period())).expect("first settle");
    let err = service.settle_case(&id, at(voting_period() + 1)).unwrap_err();
    assert!(err.to_string().contains("already finalized"));
    // Exactly one release, from the first call.
    assert_eq!(fx.escrow.released().len(), 1);
    assert_eq!(fx.transport.sent().len(), 1);
}

#[test]
fn zero_votes_refunds_fee_to_raiser() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");

    let raiser = member("raiser");
    let id = service
        .create_case(
            &subject("job-2"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(250),
            CurrencyAmount::new(9_000),
            &raiser,
            at(0),
        )
        .unwrap();

    let report = service.settle_case(&id, at(voting_period())).expect("settles");
    assert!(report.outcome.fee_shares.is_empty());
    assert_eq!(
        fx.escrow.refunded(),
        vec![(subject("job-2"), raiser, CurrencyAmount::new(250))]
    );
    // No disputed-funds release on the zero-vote path.
    assert!(fx.escrow.released().is_empty());
    assert_eq!(fx.transport.sent()[0].fee_refunded, Some(CurrencyAmount::new(250)));
}

#[test]
fn tie_resolves_against_the_raiser() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let (a, b) = (member("a"), member("b"));
    fx.stake(&a, 30_000);
    fx.stake(&b, 30_000);

    let id = service
        .create_case(
            &subject("job-3"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(100),
            CurrencyAmount::new(100),
            &member("raiser"),
            at(0),
        )
        .unwrap();
    service.cast_vote(&id, VoteDirection::For, &a, &a, at(1)).unwrap();
    service.cast_vote(&id, VoteDirection::Against, &b, &b, at(2)).unwrap();

    let report = service.settle_case(&id, at(voting_period())).unwrap();
    assert_eq!(report.outcome.winning_side, WinningSide::Counterparty);
    assert_eq!(
        fx.escrow.released(),
        vec![(subject("job-3"), WinningSide::Counterparty)]
    );
}

#[test]
fn approved_skill_verification_admits_the_applicant() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let applicant = member("applicant");
    let id = service
        .create_case(
            &subject("app-hash-1"),
            CaseKind::SkillVerification,
            "rust-dev",
            "cid",
            CurrencyAmount::new(50),
            CurrencyAmount::ZERO,
            &applicant,
            at(0),
        )
        .unwrap();
    service.cast_vote(&id, VoteDirection::For, &a, &a, at(1)).unwrap();

    let report = service.settle_case(&id, at(voting_period())).unwrap();
    assert_eq!(report.outcome.new_oracle_member, Some(applicant));
    // No escrow movement for skill verification.
    assert!(fx.escrow.released().is_empty());
    // The oracle now has a fourth member.
    let status = service
        .refresh_oracle_status("rust-dev", at(voting_period()))
        .unwrap();
    assert_eq!(status.total_members, 4);
}

#[test]
fn advisory_settlement_never_moves_funds() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let id = service
        .create_case(
            &subject("question-1"),
            CaseKind::Advisory,
            "rust-dev",
            "cid",
            CurrencyAmount::new(40),
            CurrencyAmount::ZERO,
            &member("asker"),
            at(0),
        )
        .unwrap();
    service.cast_vote(&id, VoteDirection::Against, &a, &a, at(1)).unwrap();

    let report = service.settle_case(&id, at(voting_period())).unwrap();
    assert_eq!(report.outcome.winning_side, WinningSide::Counterparty);
    assert_eq!(report.outcome.fee_shares.len(), 1);
    assert!(fx.escrow.released().is_empty());
    assert!(fx.escrow.refunded().is_empty());
}

#[test]
fn create_against_inactive_oracle_is_rejected() {
    let fx = Fixture::new();
    let service = fx.open();
    // Oracle exists but was never refreshed with enough active members.
    service.add_oracle("lonely", at(0)).unwrap();

    let err = service
        .create_case(
            &subject("job-9"),
            CaseKind::Dispute,
            "lonely",
            "cid",
            CurrencyAmount::new(10),
            CurrencyAmount::new(10),
            &member("raiser"),
            at(0),
        )
        .unwrap_err();
    assert!(err.to_string().contains("not active"));
}

#[test]
fn votes_after_window_and_early_settlement_are_rejected() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let id = service
        .create_case(
            &subject("job-4"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(10),
            CurrencyAmount::new(10),
            &member("raiser"),
            at(0),
        )
        .unwrap();

    let early = service.settle_case(&id, at(voting_period() - 1)).unwrap_err();
    assert!(early.to_string().contains("still open"));

    let late = service
        .cast_vote(&id, VoteDirection::For, &a, &a, at(voting_period()))
        .unwrap_err();
    assert!(late.to_string().contains("closed"));
}

#[test]
fn delegated_weight_lands_on_the_delegatee_only() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let (rep, constituent) = (member("rep"), member("constituent"));
    fx.stake(&rep, 20_000);
    fx.stake(&constituent, 30_000);
    service.delegate(&constituent, &rep).unwrap();

    let id = service
        .create_case(
            &subject("job-5"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(10),
            CurrencyAmount::new(10),
            &member("raiser"),
            at(0),
        )
        .unwrap();

    let weight = service
        .cast_vote(&id, VoteDirection::For, &rep, &rep, at(1))
        .unwrap();
    assert_eq!(weight, 50_000); // own 20k + delegated 30k

    // The delegator's own ballot carries nothing while delegated.
    let err = service
        .cast_vote(&id, VoteDirection::Against, &constituent, &constituent, at(2))
        .unwrap_err();
    assert!(err.to_string().contains("zero vote weight"));
}

// ---------------------------------------------------------------------------
// Payments, governance unlocking, claims
// ---------------------------------------------------------------------------

#[test]
fn payment_credits_payee_and_both_referrers() {
    let fx = Fixture::new();
    let service = fx.open();
    let (payer, payee) = (member("client"), member("worker"));
    let (ref_a, ref_b) = (member("ref-a"), member("ref-b"));
    fx.profiles.set_referrer(payer.clone(), ref_a.clone());
    fx.profiles.set_referrer(payee.clone(), ref_b.clone());

    // Band 0 rate is 300 tokens per unit; each referrer takes 10%.
    let rewards = service
        .process_payment(
            &payer,
            &payee,
            CurrencyAmount::new(1_000),
            CurrencyAmount::new(1_000),
        )
        .expect("payment processed");
    assert_eq!(rewards.band, 0);

    let tokens_of = |who: &MemberAddress| {
        rewards
            .shares
            .iter()
            .find(|s| &s.recipient == who)
            .map(|s| s.tokens.raw())
            .unwrap_or(0)
    };
    assert_eq!(tokens_of(&ref_a), 100 * 300);
    assert_eq!(tokens_of(&ref_b), 100 * 300);
    assert_eq!(tokens_of(&payee), 800 * 300);

    // Everything is earned but locked until governance participation.
    assert_eq!(
        service.claimable_of(&payee).unwrap(),
        TokenAmount::ZERO
    );
}

#[test]
fn governance_actions_unlock_one_rate_unit_each() {
    let fx = Fixture::new();
    let service = fx.open();
    let (payer, payee) = (member("client"), member("worker"));

    // 10 units in band 0 → 3,000 tokens earned.
    service
        .process_payment(&payer, &payee, CurrencyAmount::new(10), CurrencyAmount::new(10))
        .unwrap();

    for _ in 0..5 {
        service.record_governance_action(&payee).unwrap();
    }
    // min(3000, 5 × 300) = 1500.
    assert_eq!(
        service.claimable_of(&payee).unwrap(),
        TokenAmount::new(1_500)
    );
    // The platform was told about each action.
    assert_eq!(fx.escrow.governance_actions().len(), 5);
}

#[test]
fn claims_are_capped_at_claimable() {
    let fx = Fixture::new();
    let service = fx.open();
    let (payer, payee) = (member("client"), member("worker"));
    service
        .process_payment(&payer, &payee, CurrencyAmount::new(10), CurrencyAmount::new(10))
        .unwrap();
    service.record_governance_action(&payee).unwrap();
    assert_eq!(service.claimable_of(&payee).unwrap(), TokenAmount::new(300));

    let err = service.claim(&payee, TokenAmount::new(301)).unwrap_err();
    assert!(err.to_string().contains("exceeds claimable"));

    service.claim(&payee, TokenAmount::new(300)).expect("claim ok");
    assert_eq!(service.claimable_of(&payee).unwrap(), TokenAmount::ZERO);
}

#[test]
fn governance_actions_follow_the_volume_watermark() {
    let fx = Fixture::new();
    let service = fx.open();
    let (payer, payee) = (member("client"), member("worker"));

    // Payment ending at 100,500 lands in band 1 (100,000–500,000).
    service
        .process_payment(
            &payer,
            &payee,
            CurrencyAmount::new(1_000),
            CurrencyAmount::new(100_500),
        )
        .unwrap();

    // An action now unlocks at band 1's rate (150), not band 0's.
    service.record_governance_action(&payee).unwrap();
    assert_eq!(
        service.claimable_of(&payee).unwrap(),
        TokenAmount::new(150)
    );
}

#[test]
fn unreachable_collaborators_degrade_to_zero_power() {
    let store = Arc::new(NullStore::new());
    let service = TribunalService::open(
        LedgerParams::tribunal_defaults(),
        BandSchedule::tribunal_defaults(),
        Stores {
            cases: store.clone(),
            oracles: store.clone(),
            rewards: store.clone(),
            meta: store,
        },
        Collaborators {
            stakes: Some(Arc::new(NullStakeRegistry::unreachable())),
            escrow: None,
            profiles: None,
            transport: None,
        },
    )
    .unwrap();

    // Payments still process (no referrers found), power is just zero.
    let rewards = service
        .process_payment(
            &member("client"),
            &member("worker"),
            CurrencyAmount::new(100),
            CurrencyAmount::new(100),
        )
        .unwrap();
    assert_eq!(rewards.shares.len(), 1);
}

// ---------------------------------------------------------------------------
// Inbound messages and persistence
// ---------------------------------------------------------------------------

#[test]
fn inbound_create_and_governance_messages_apply() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");

    let id = service
        .apply_inbound(
            InboundMessage::CreateCase {
                subject: subject("remote-job-1"),
                kind: CaseKind::Dispute,
                oracle: "rust-dev".to_string(),
                evidence: "cid".to_string(),
                fee: CurrencyAmount::new(10),
                disputed_amount: CurrencyAmount::new(10),
                raiser: member("remote-raiser"),
            },
            at(5),
        )
        .expect("applies")
        .expect("created a case");
    assert!(service.case(&id).is_some());

    service
        .apply_inbound(
            InboundMessage::GovernanceAction {
                member: member("remote-voter"),
            },
            at(6),
        )
        .expect("applies");
    assert_eq!(fx.escrow.governance_actions(), vec![member("remote-voter")]);
}

#[test]
fn inbound_addresses_are_validated() {
    let fx = Fixture::new();
    let service = fx.open();
    // Non-graphic characters pass serde but fail validation at the service.
    let err = service
        .apply_inbound(
            InboundMessage::GovernanceAction {
                member: member("has space"),
            },
            at(0),
        )
        .unwrap_err();
    assert!(err.to_string().contains("invalid member address"));
}

#[test]
fn state_survives_a_restart_through_the_store() {
    let fx = Fixture::new();
    {
        let service = fx.open();
        active_oracle(&fx, &service, "rust-dev");
        let a = member("a");
        fx.stake(&a, 50_000);
        let id = service
            .create_case(
                &subject("job-8"),
                CaseKind::Dispute,
                "rust-dev",
                "cid",
                CurrencyAmount::new(100),
                CurrencyAmount::new(100),
                &member("raiser"),
                at(0),
            )
            .unwrap();
        service.cast_vote(&id, VoteDirection::For, &a, &a, at(1)).unwrap();
        service
            .process_payment(
                &member("client"),
                &member("worker"),
                CurrencyAmount::new(10),
                CurrencyAmount::new(10),
            )
            .unwrap();
    }

    // Same stores, new service: everything is back.
    let service = fx.open();
    let id = tribunal_types::CaseId::derive(&subject("job-8"), 0);
    let case = service.case(&id).expect("case restored");
    assert_eq!(case.votes_for, 50_000);
    assert!(service.oracle_is_active("rust-dev"));

    // Settling the restored case works and releases funds.
    let report = service.settle_case(&id, at(voting_period())).unwrap();
    assert_eq!(report.outcome.winning_side, WinningSide::Raiser);

    // A second case about the same subject continues the sequence.
    let next = service
        .create_case(
            &subject("job-8"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(1),
            CurrencyAmount::new(1),
            &member("raiser"),
            at(voting_period() + 1),
        )
        .unwrap();
    assert_eq!(next.as_str(), "job-8-1");
}

#[test]
fn full_lifecycle_persists_through_lmdb() {
    let dir = tempfile::tempdir().expect("temp dir");
    let open_stores = || {
        let env = tribunal_store_lmdb::LmdbEnvironment::open(dir.path(), 8, 64 * 1024 * 1024)
            .expect("open env");
        Stores {
            cases: Arc::new(env.case_store()),
            oracles: Arc::new(env.oracle_store()),
            rewards: Arc::new(env.reward_store()),
            meta: Arc::new(env.meta_store()),
        }
    };

    let fx = Fixture::new();
    {
        let service = TribunalService::open(
            LedgerParams::tribunal_defaults(),
            BandSchedule::tribunal_defaults(),
            open_stores(),
            fx.collaborators(),
        )
        .unwrap();
        active_oracle(&fx, &service, "rust-dev");
        service
            .process_payment(
                &member("client"),
                &member("worker"),
                CurrencyAmount::new(10),
                CurrencyAmount::new(10),
            )
            .unwrap();
        service.record_governance_action(&member("worker")).unwrap();
    }

    let service = TribunalService::open(
        LedgerParams::tribunal_defaults(),
        BandSchedule::tribunal_defaults(),
        open_stores(),
        fx.collaborators(),
    )
    .unwrap();
    assert!(service.oracle_is_active("rust-dev"));
    assert_eq!(
        service.claimable_of(&member("worker")).unwrap(),
        TokenAmount::new(300)
    );
}

#[test]
fn rejecting_escrow_surfaces_effect_errors_without_unwinding() {
    let fx = Fixture::new();
    let escrow = Arc::new(NullEscrow::rejecting_writes());
    let service = TribunalService::open(
        LedgerParams::tribunal_defaults(),
        BandSchedule::tribunal_defaults(),
        fx.stores(),
        Collaborators {
            stakes: Some(fx.stakes.clone()),
            escrow: Some(escrow),
            profiles: None,
            transport: Some(fx.transport.clone()),
        },
    )
    .unwrap();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let id = service
        .create_case(
            &subject("job-10"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(100),
            CurrencyAmount::new(100),
            &member("raiser"),
            at(0),
        )
        .unwrap();
    service.cast_vote(&id, VoteDirection::For, &a, &a, at(1)).unwrap();

    let report = service.settle_case(&id, at(voting_period())).expect("settles");
    assert_eq!(report.effect_errors.len(), 1);
    assert!(report.effect_errors[0].starts_with("escrow:"));
    // The case is finalized regardless; a retry is rejected.
    assert!(service.settle_case(&id, at(voting_period() + 1)).is_err());
    // The relay still happened.
    assert_eq!(fx.transport.sent().len(), 1);
}

#[test]
fn stats_count_operations() {
    let fx = Fixture::new();
    let service = fx.open();
    active_oracle(&fx, &service, "rust-dev");
    let a = member("a");
    fx.stake(&a, 50_000);

    let id = service
        .create_case(
            &subject("job-11"),
            CaseKind::Dispute,
            "rust-dev",
            "cid",
            CurrencyAmount::new(10),
            CurrencyAmount::new(10),
            &member("raiser"),
            at(0),
        )
        .unwrap();
    service.cast_vote(&id, VoteDirection::For, &a, &a, at(1)).unwrap();
    service.settle_case(&id, at(voting_period())).unwrap();

    let stats = service.stats();
    assert_eq!(stats["cases_created"], 1);
    assert_eq!(stats["votes_cast"], 1);
    assert_eq!(stats["cases_settled"], 1);
    // Each vote also counts as a governance action.
    assert_eq!(stats["governance_actions"], 1);
}
