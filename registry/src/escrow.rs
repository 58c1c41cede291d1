use crate::RegistryError;
use tribunal_types::{CurrencyAmount, MemberAddress, SubjectId, TokenAmount, WinningSide};

/// The escrow / job-lifecycle contract, as seen from the ledger.
///
/// Reads feed voting power; writes carry out settlement decisions. The
/// ledger settles first and instructs second, so a failed instruction never
/// unwinds a finalized case; the service logs and reports it instead.
pub trait Escrow {
    /// Reward tokens the member has earned on the platform, locked or not.
    /// Earned-but-locked tokens still count toward voting power.
    fn earned_tokens(&self, member: &MemberAddress) -> Result<TokenAmount, RegistryError>;

    /// Release the disputed funds held for `subject` to the winning side.
    fn release_disputed_funds(
        &self,
        subject: &SubjectId,
        side: WinningSide,
    ) -> Result<(), RegistryError>;

    /// Return the full dispute fee to the raiser. Only happens when a case
    /// settles with no votes at all.
    fn refund_fee(
        &self,
        subject: &SubjectId,
        raiser: &MemberAddress,
        amount: CurrencyAmount,
    ) -> Result<(), RegistryError>;

    /// Tell the platform a member performed a governance action, so its own
    /// unlock accounting stays in step with the ledger's.
    fn increment_governance_action(&self, member: &MemberAddress) -> Result<(), RegistryError>;
}
