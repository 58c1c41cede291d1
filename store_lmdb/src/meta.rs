use heed::types::Bytes;
use heed::{Database, Env};
use std::sync::Arc;

use tribunal_store::{MetaStore, StoreError};

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// String-keyed metadata on the shared meta database.
///
/// This is the same keyspace the engine stores write their byte-keyed
/// metadata into; the split between the two views is purely which trait the
/// caller holds.
pub struct LmdbMetaStore {
    env: Arc<Env>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbMetaStore {
    pub fn new(env: Arc<Env>, meta_db: Database<Bytes, Bytes>) -> Self {
        Self { env, meta_db }
    }

    fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match self.meta_db.get(&txn, key) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn write(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.meta_db
            .put(&mut txn, key, value)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

impl MetaStore for LmdbMetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.write(key.as_bytes(), value)
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(key.as_bytes())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.meta_db
            .delete(&mut txn, key.as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.read(SCHEMA_VERSION_KEY)? {
            Some(bytes) if bytes.len() == 4 => {
                let arr: [u8; 4] = bytes.as_slice().try_into().expect("checked length");
                Ok(u32::from_le_bytes(arr))
            }
            Some(_) => Err(StoreError::Corruption(
                "schema_version has unexpected byte length".to_string(),
            )),
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.write(SCHEMA_VERSION_KEY, &version.to_le_bytes())
    }
}
