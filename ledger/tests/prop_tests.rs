use proptest::prelude::*;

use tribunal_ledger::RewardLedger;
use tribunal_rewards::{BandSchedule, RewardBand};
use tribunal_types::{MemberAddress, TokenAmount};

fn single_band(rate: u128) -> BandSchedule {
    BandSchedule::new(vec![RewardBand::new(0, u128::MAX, rate)]).unwrap()
}

fn two_bands(rate_hi: u128, rate_lo: u128) -> BandSchedule {
    BandSchedule::new(vec![
        RewardBand::new(0, 100_000, rate_hi),
        RewardBand::new(100_000, u128::MAX, rate_lo),
    ])
    .unwrap()
}

proptest! {
    /// Claimable tokens never exceed what was earned.
    #[test]
    fn claimable_never_exceeds_earned(
        earned in 0u128..1_000_000_000,
        actions in 0u64..10_000,
        rate in 1u128..1_000_000,
    ) {
        let schedule = single_band(rate);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
        }

        let claimable = ledger.claimable_of(&member, &schedule).unwrap();
        prop_assert!(
            claimable.raw() <= earned,
            "claimable {} exceeds earned {}", claimable, earned
        );
    }

    /// More governance actions never shrink the claimable amount.
    #[test]
    fn claimable_monotone_in_actions(
        earned in 0u128..1_000_000_000,
        actions in 0u64..1_000,
        extra in 1u64..1_000,
        rate in 1u128..1_000_000,
    ) {
        let schedule = single_band(rate);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
        }
        let before = ledger.claimable_of(&member, &schedule).unwrap();

        for _ in 0..extra {
            ledger.record_governance_action(&member, 0).unwrap();
        }
        let after = ledger.claimable_of(&member, &schedule).unwrap();

        prop_assert!(
            after >= before,
            "claimable fell from {} to {} after more actions", before, after
        );
    }

    /// Claiming exactly the reported claimable amount always succeeds, and
    /// claimed balances stay within earned balances afterwards.
    #[test]
    fn full_claim_always_accepted(
        earned in 0u128..1_000_000_000,
        actions in 0u64..10_000,
        rate in 1u128..1_000_000,
    ) {
        let schedule = single_band(rate);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
        }

        let claimable = ledger.claimable_of(&member, &schedule).unwrap();
        ledger.mark_claimed(&member, claimable, &schedule).unwrap();

        if let Some(rewards) = ledger.member(&member) {
            prop_assert_eq!(rewards.total_claimed(), claimable);
            prop_assert!(
                rewards.total_claimed() <= rewards.total_earned(),
                "claimed {} exceeds earned {}",
                rewards.total_claimed(), rewards.total_earned()
            );
        }
    }

    /// Claiming in two installments totals the same as one full claim.
    #[test]
    fn split_claim_equals_full_claim(
        earned in 1u128..1_000_000_000,
        actions in 1u64..10_000,
        rate in 1u128..1_000_000,
        first_pct in 0u64..=100,
    ) {
        let schedule = single_band(rate);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
        }

        let claimable = ledger.claimable_of(&member, &schedule).unwrap();
        let first = TokenAmount::new(claimable.raw() * first_pct as u128 / 100);
        let second = TokenAmount::new(claimable.raw() - first.raw());

        ledger.mark_claimed(&member, first, &schedule).unwrap();
        ledger.mark_claimed(&member, second, &schedule).unwrap();

        if let Some(rewards) = ledger.member(&member) {
            prop_assert_eq!(
                rewards.total_claimed(), claimable,
                "installments must total the original claimable"
            );
        }
    }

    /// A claim spanning two bands conserves the requested amount exactly.
    #[test]
    fn cross_band_claim_conserves_amount(
        earned_hi in 1u128..1_000_000,
        earned_lo in 1u128..1_000_000,
        actions in 1u64..1_000,
        rate_hi in 2u128..1_000,
        rate_lo_seed in 0u128..1_000,
    ) {
        let rate_lo = 1 + rate_lo_seed % rate_hi;
        let schedule = two_bands(rate_hi, rate_lo);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned_hi)).unwrap();
        ledger.record_earning(&member, 1, TokenAmount::new(earned_lo)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
            ledger.record_governance_action(&member, 1).unwrap();
        }

        let claimable = ledger.claimable_of(&member, &schedule).unwrap();
        ledger.mark_claimed(&member, claimable, &schedule).unwrap();

        let rewards = ledger.member(&member).unwrap();
        prop_assert_eq!(rewards.total_claimed(), claimable);
        for entry in &rewards.bands {
            prop_assert!(
                entry.claimed <= entry.earned,
                "band {} claimed {} beyond earned {}",
                entry.band, entry.claimed, entry.earned
            );
        }
    }

    /// Requests above the claimable amount are rejected and nothing moves.
    #[test]
    fn overclaim_never_mutates(
        earned in 0u128..1_000_000_000,
        actions in 0u64..10_000,
        rate in 1u128..1_000_000,
        excess in 1u128..1_000,
    ) {
        let schedule = single_band(rate);
        let mut ledger = RewardLedger::new();
        let member = MemberAddress::new("prop_member");

        ledger.record_earning(&member, 0, TokenAmount::new(earned)).unwrap();
        for _ in 0..actions {
            ledger.record_governance_action(&member, 0).unwrap();
        }

        let claimable = ledger.claimable_of(&member, &schedule).unwrap();
        let request = TokenAmount::new(claimable.raw() + excess);
        prop_assert!(ledger.mark_claimed(&member, request, &schedule).is_err());

        if let Some(rewards) = ledger.member(&member) {
            prop_assert_eq!(rewards.total_claimed(), TokenAmount::ZERO);
        }
    }
}
