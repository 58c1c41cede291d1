//! Referral bonus splitting.

use crate::error::RewardError;
use tribunal_types::CurrencyAmount;

const BPS_DENOMINATOR: u128 = 10_000;

/// The notional slice of a payment a single referrer is entitled to,
/// floored. At the default 1000 bps this is a tenth of the payment.
pub fn referral_cut(amount: CurrencyAmount, share_bps: u32) -> Result<CurrencyAmount, RewardError> {
    let cut = amount
        .raw()
        .checked_mul(share_bps as u128)
        .ok_or(RewardError::Overflow)?
        / BPS_DENOMINATOR;
    Ok(CurrencyAmount::new(cut))
}
