use crate::RegistryError;
use tribunal_types::MemberAddress;

/// Read access to the member profile contract.
pub trait ProfileRegistry {
    /// The member's referrer, `None` when they joined unreferred.
    ///
    /// Implementations guarantee a referrer is never the member themself;
    /// reward code does not re-check.
    fn referrer_of(&self, member: &MemberAddress)
        -> Result<Option<MemberAddress>, RegistryError>;
}
