use crate::StoreError;
use tribunal_types::CaseId;

/// Store trait for persisting case engine state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `tribunal-voting`
/// crate (which would create a circular dependency). The case engine
/// serializes/deserializes its own types.
///
/// Cases are append-only: finalized cases stay on disk as the audit trail,
/// so there is no delete.
pub trait CaseStore {
    fn get_case(&self, id: &CaseId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_case(&self, id: &CaseId, case: &[u8]) -> Result<(), StoreError>;
    fn iter_cases(&self) -> Result<Vec<(CaseId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
