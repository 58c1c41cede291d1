//! Payment reward computation.
//!
//! A payment's notional value is split between the payee and up to two
//! referrers, then every share is priced through the band schedule against
//! the same pre-payment baseline, each over its own notional width. The
//! caller supplies the post-payment cumulative total; the pre-payment
//! baseline is derived from it, never tracked here.

use crate::bands::BandSchedule;
use crate::error::RewardError;
use crate::referral::referral_cut;
use std::sync::Arc;
use tribunal_registry::ProfileRegistry;
use tribunal_types::{CurrencyAmount, LedgerParams, MemberAddress, TokenAmount};

/// Why a recipient is getting tokens out of a payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareKind {
    Payee,
    PayerReferrer,
    PayeeReferrer,
}

/// One recipient's slice of a payment, priced in tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardShare {
    pub recipient: MemberAddress,
    pub kind: ShareKind,
    /// The currency slice this share was priced over.
    pub notional: CurrencyAmount,
    pub tokens: TokenAmount,
}

/// Everything one payment earns, ready to be recorded in the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRewards {
    /// Band the earnings are credited under: the band of the post-payment
    /// cumulative total.
    pub band: usize,
    pub shares: Vec<RewardShare>,
}

/// Prices payments through the band schedule.
pub struct RewardCalculator {
    schedule: BandSchedule,
    referral_share_bps: u32,
    profiles: Option<Arc<dyn ProfileRegistry + Send + Sync>>,
}

impl RewardCalculator {
    pub fn new(
        schedule: BandSchedule,
        params: &LedgerParams,
        profiles: Option<Arc<dyn ProfileRegistry + Send + Sync>>,
    ) -> Self {
        Self {
            schedule,
            referral_share_bps: params.referral_share_bps,
            profiles,
        }
    }

    pub fn schedule(&self) -> &BandSchedule {
        &self.schedule
    }

    /// Swap in a new governed schedule. Already-recorded earnings keep
    /// their old band indices; only future pricing changes.
    pub fn set_schedule(&mut self, schedule: BandSchedule) {
        self.schedule = schedule;
    }

    /// Price one payment. `new_cumulative_total` is the platform volume
    /// after this payment; the pre-payment baseline is recovered from it.
    ///
    /// Every share is priced as `tokens_for_range(baseline, baseline +
    /// share)`: all from the same baseline, each over its own width. The
    /// shares of one payment therefore do not price each other's volume,
    /// and a referrer's cut earns at exactly the rate the start of the
    /// payment earns at.
    pub fn payment_rewards(
        &self,
        payer: &MemberAddress,
        payee: &MemberAddress,
        amount: CurrencyAmount,
        new_cumulative_total: CurrencyAmount,
    ) -> Result<PaymentRewards, RewardError> {
        let baseline = new_cumulative_total.checked_sub(amount).ok_or(
            RewardError::CumulativeMismatch {
                amount: amount.raw(),
                new_total: new_cumulative_total.raw(),
            },
        )?;

        let payer_referrer = self.referrer_of(payer);
        let payee_referrer = self.referrer_of(payee);

        let mut shares = Vec::with_capacity(3);
        let mut deducted = CurrencyAmount::ZERO;

        let referrer_share = |referrer: Option<MemberAddress>,
                                  kind: ShareKind|
         -> Result<Option<RewardShare>, RewardError> {
            let Some(recipient) = referrer else {
                return Ok(None);
            };
            let cut = referral_cut(amount, self.referral_share_bps)?;
            if cut.is_zero() {
                return Ok(None);
            }
            let tokens = self.price(baseline, cut)?;
            Ok(Some(RewardShare {
                recipient,
                kind,
                notional: cut,
                tokens,
            }))
        };

        let payer_ref_share = referrer_share(payer_referrer, ShareKind::PayerReferrer)?;
        let payee_ref_share = referrer_share(payee_referrer, ShareKind::PayeeReferrer)?;
        for share in payer_ref_share.iter().chain(payee_ref_share.iter()) {
            deducted = deducted
                .checked_add(share.notional)
                .ok_or(RewardError::Overflow)?;
        }

        // Deductions are each a bps fraction of the amount, so they can
        // never exceed it while referral_share_bps stays sane; the checked
        // sub still guards a misconfigured share.
        let payee_notional = amount
            .checked_sub(deducted)
            .ok_or(RewardError::Overflow)?;
        let payee_tokens = self.price(baseline, payee_notional)?;
        shares.push(RewardShare {
            recipient: payee.clone(),
            kind: ShareKind::Payee,
            notional: payee_notional,
            tokens: payee_tokens,
        });
        shares.extend(payer_ref_share);
        shares.extend(payee_ref_share);

        Ok(PaymentRewards {
            band: self.schedule.current_band(new_cumulative_total.raw()),
            shares,
        })
    }

    fn price(
        &self,
        baseline: CurrencyAmount,
        notional: CurrencyAmount,
    ) -> Result<TokenAmount, RewardError> {
        let from = baseline.raw();
        let to = from
            .checked_add(notional.raw())
            .ok_or(RewardError::Overflow)?;
        Ok(TokenAmount::new(self.schedule.tokens_for_range(from, to)?))
    }

    fn referrer_of(&self, member: &MemberAddress) -> Option<MemberAddress> {
        // An absent or failing profile collaborator reads as "unreferred";
        // a payment is never blocked on referral lookups.
        self.profiles
            .as_ref()
            .and_then(|p| p.referrer_of(member).ok())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::RewardBand;
    use std::collections::HashMap;
    use tribunal_registry::RegistryError;

    fn member(name: &str) -> MemberAddress {
        MemberAddress::new(name)
    }

    struct FixedProfiles(HashMap<MemberAddress, MemberAddress>);

    impl ProfileRegistry for FixedProfiles {
        fn referrer_of(
            &self,
            member: &MemberAddress,
        ) -> Result<Option<MemberAddress>, RegistryError> {
            Ok(self.0.get(member).cloned())
        }
    }

    struct FailingProfiles;

    impl ProfileRegistry for FailingProfiles {
        fn referrer_of(
            &self,
            _member: &MemberAddress,
        ) -> Result<Option<MemberAddress>, RegistryError> {
            Err(RegistryError::Unavailable("test".into()))
        }
    }

    fn flat_schedule() -> BandSchedule {
        BandSchedule::new(vec![RewardBand::new(0, u128::MAX, 100)]).unwrap()
    }

    fn two_rate_schedule() -> BandSchedule {
        BandSchedule::new(vec![
            RewardBand::new(0, 1_000, 10),
            RewardBand::new(1_000, u128::MAX, 5),
        ])
        .unwrap()
    }

    fn calculator(
        schedule: BandSchedule,
        referrers: &[(&str, &str)],
    ) -> RewardCalculator {
        let map = referrers
            .iter()
            .map(|(m, r)| (member(m), member(r)))
            .collect::<HashMap<_, _>>();
        RewardCalculator::new(
            schedule,
            &LedgerParams::default(),
            Some(Arc::new(FixedProfiles(map))),
        )
    }

    #[test]
    fn test_unreferred_payee_takes_whole_amount() {
        let calc = calculator(flat_schedule(), &[]);
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(1_000),
                CurrencyAmount::new(1_000),
            )
            .unwrap();

        assert_eq!(rewards.shares.len(), 1);
        let payee = &rewards.shares[0];
        assert_eq!(payee.kind, ShareKind::Payee);
        assert_eq!(payee.notional.raw(), 1_000);
        assert_eq!(payee.tokens.raw(), 100_000);
    }

    #[test]
    fn test_both_referrers_take_a_tenth_each() {
        let calc = calculator(
            flat_schedule(),
            &[("payer", "ref-a"), ("payee", "ref-b")],
        );
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(1_000),
                CurrencyAmount::new(5_000),
            )
            .unwrap();

        assert_eq!(rewards.shares.len(), 3);
        let [payee, payer_ref, payee_ref] = &rewards.shares[..] else {
            panic!("expected three shares");
        };
        assert_eq!(payee.notional.raw(), 800);
        assert_eq!(payer_ref.kind, ShareKind::PayerReferrer);
        assert_eq!(payer_ref.recipient, member("ref-a"));
        assert_eq!(payer_ref.notional.raw(), 100);
        assert_eq!(payee_ref.kind, ShareKind::PayeeReferrer);
        assert_eq!(payee_ref.recipient, member("ref-b"));
        assert_eq!(payee_ref.notional.raw(), 100);

        // Notionals always reassemble the payment.
        let total: u128 = rewards.shares.iter().map(|s| s.notional.raw()).sum();
        assert_eq!(total, 1_000);
    }

    #[test]
    fn test_single_referrer_leaves_payee_nine_tenths() {
        let calc = calculator(flat_schedule(), &[("payer", "ref-a")]);
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(1_000),
                CurrencyAmount::new(1_000),
            )
            .unwrap();

        assert_eq!(rewards.shares.len(), 2);
        assert_eq!(rewards.shares[0].notional.raw(), 900);
        assert_eq!(rewards.shares[1].notional.raw(), 100);
    }

    #[test]
    fn test_every_share_priced_from_prepayment_baseline() {
        // Baseline 900 sits in the 10-rate band which ends at 1_000. Each
        // share prices from 900 over its own width, not stacked after the
        // shares before it.
        let calc = calculator(
            two_rate_schedule(),
            &[("payer", "ref-a"), ("payee", "ref-b")],
        );
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(200),
                CurrencyAmount::new(1_100),
            )
            .unwrap();

        // Payee: 160 wide from 900 → 100 @ 10 + 60 @ 5.
        assert_eq!(rewards.shares[0].tokens.raw(), 100 * 10 + 60 * 5);
        // Each referrer: 20 wide from 900 → all inside the 10-rate band.
        assert_eq!(rewards.shares[1].tokens.raw(), 20 * 10);
        assert_eq!(rewards.shares[2].tokens.raw(), 20 * 10);

        // Credited band is the post-payment one.
        assert_eq!(rewards.band, 1);
    }

    #[test]
    fn test_tiny_payment_rounds_referrers_out() {
        let calc = calculator(flat_schedule(), &[("payer", "ref-a")]);
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(9),
                CurrencyAmount::new(9),
            )
            .unwrap();

        // A tenth of 9 floors to zero: no referrer share is emitted and
        // the payee keeps everything.
        assert_eq!(rewards.shares.len(), 1);
        assert_eq!(rewards.shares[0].notional.raw(), 9);
    }

    #[test]
    fn test_failing_profiles_read_as_unreferred() {
        let calc = RewardCalculator::new(
            flat_schedule(),
            &LedgerParams::default(),
            Some(Arc::new(FailingProfiles)),
        );
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(1_000),
                CurrencyAmount::new(1_000),
            )
            .unwrap();
        assert_eq!(rewards.shares.len(), 1);
        assert_eq!(rewards.shares[0].notional.raw(), 1_000);
    }

    #[test]
    fn test_amount_beyond_cumulative_rejected() {
        let calc = calculator(flat_schedule(), &[]);
        let result = calc.payment_rewards(
            &member("payer"),
            &member("payee"),
            CurrencyAmount::new(2_000),
            CurrencyAmount::new(1_000),
        );
        assert!(matches!(
            result,
            Err(RewardError::CumulativeMismatch { .. })
        ));
    }

    #[test]
    fn test_equal_rate_boundary_payment() {
        // 1_000 paid at cumulative 99_500, crossing 100_000 where both
        // sides rate 300: exactly 300_000 tokens, no seam.
        let schedule = BandSchedule::new(vec![
            RewardBand::new(0, 100_000, 300),
            RewardBand::new(100_000, u128::MAX, 300),
        ])
        .unwrap();
        let calc = calculator(schedule, &[]);
        let rewards = calc
            .payment_rewards(
                &member("payer"),
                &member("payee"),
                CurrencyAmount::new(1_000),
                CurrencyAmount::new(100_500),
            )
            .unwrap();
        assert_eq!(rewards.shares[0].tokens.raw(), 300_000);
        assert_eq!(rewards.band, 1);
    }
}
