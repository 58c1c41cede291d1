use heed::types::Bytes;
use heed::{Database, Env};
use std::sync::Arc;

use tribunal_store::{RewardStore, StoreError};
use tribunal_types::MemberAddress;

/// Per-member reward ledger persistence on LMDB, keyed by address.
pub struct LmdbRewardStore {
    env: Arc<Env>,
    members_db: Database<Bytes, Bytes>,
}

impl LmdbRewardStore {
    pub fn new(env: Arc<Env>, members_db: Database<Bytes, Bytes>) -> Self {
        Self { env, members_db }
    }
}

impl RewardStore for LmdbRewardStore {
    fn get_member(&self, member: &MemberAddress) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match self.members_db.get(&txn, member.as_str().as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn put_member(&self, member: &MemberAddress, state: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.members_db
            .put(&mut txn, member.as_str().as_bytes(), state)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn iter_members(&self) -> Result<Vec<(MemberAddress, Vec<u8>)>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut results = Vec::new();
        let iter = self
            .members_db
            .iter(&txn)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        for item in iter {
            let (key, val) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let addr = std::str::from_utf8(key)
                .map_err(|e| StoreError::Corruption(format!("non-utf8 member key: {e}")))?;
            results.push((MemberAddress::new(addr.to_string()), val.to_vec()));
        }
        Ok(results)
    }
}
