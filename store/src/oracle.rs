use crate::StoreError;

/// Store trait for persisting oracle cohort state.
///
/// Keyed by oracle name. Payloads are opaque bytes serialized by the oracle
/// registry itself.
pub trait OracleStore {
    fn get_oracle(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_oracle(&self, name: &str, oracle: &[u8]) -> Result<(), StoreError>;
    fn iter_oracles(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
