//! Proportional fee distribution among winning voters.

use crate::error::CaseError;
use serde::{Deserialize, Serialize};
use tribunal_types::{CurrencyAmount, MemberAddress};

/// One winning voter's cut of a settled case's fee pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeShare {
    /// The claim address the voter registered at cast time.
    pub claim_address: MemberAddress,
    pub amount: CurrencyAmount,
}

/// Split `fee` among the winning voters in proportion to their weight.
///
/// Each share is `floor(fee × weight / total_weight)`. The flooring
/// remainder is retained by the pool, never redistributed, so the shares
/// sum to at most `fee`. A zero total weight is an invariant violation:
/// the zero-vote path is intercepted before settlement reaches here.
pub fn distribute_fee(
    case: &str,
    fee: CurrencyAmount,
    winners: &[(MemberAddress, u128)],
) -> Result<Vec<FeeShare>, CaseError> {
    let mut total: u128 = 0;
    for (_, weight) in winners {
        total = total.checked_add(*weight).ok_or(CaseError::Overflow)?;
    }
    if total == 0 {
        return Err(CaseError::ZeroWinningWeight(case.to_string()));
    }

    winners
        .iter()
        .map(|(claim_address, weight)| {
            let amount = fee
                .raw()
                .checked_mul(*weight)
                .ok_or(CaseError::Overflow)?
                / total;
            Ok(FeeShare {
                claim_address: claim_address.clone(),
                amount: CurrencyAmount::new(amount),
            })
        })
        .collect()
}
