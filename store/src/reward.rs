use crate::StoreError;
use tribunal_types::MemberAddress;

/// Store trait for persisting per-member reward ledger state.
///
/// One opaque payload per member, serialized by the reward ledger itself.
pub trait RewardStore {
    fn get_member(&self, member: &MemberAddress) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_member(&self, member: &MemberAddress, state: &[u8]) -> Result<(), StoreError>;
    fn iter_members(&self) -> Result<Vec<(MemberAddress, Vec<u8>)>, StoreError>;
}
