//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use tribunal_store::{CaseStore, MetaStore, OracleStore, RewardStore, StoreError};
use tribunal_types::{CaseId, MemberAddress};

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// An in-memory implementation of every storage trait.
///
/// All engines share one meta keyspace, just like the LMDB backend's single
/// meta database, so key collisions show up in tests too.
pub struct NullStore {
    cases: Mutex<HashMap<CaseId, Vec<u8>>>,
    oracles: Mutex<HashMap<String, Vec<u8>>>,
    members: Mutex<HashMap<MemberAddress, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            cases: Mutex::new(HashMap::new()),
            oracles: Mutex::new(HashMap::new()),
            members: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
        }
    }

    fn meta_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.meta.lock().unwrap().get(key).cloned()
    }

    fn meta_put(&self, key: &[u8], value: &[u8]) {
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseStore for NullStore {
    fn get_case(&self, id: &CaseId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.cases.lock().unwrap().get(id).cloned())
    }

    fn put_case(&self, id: &CaseId, case: &[u8]) -> Result<(), StoreError> {
        self.cases.lock().unwrap().insert(id.clone(), case.to_vec());
        Ok(())
    }

    fn iter_cases(&self) -> Result<Vec<(CaseId, Vec<u8>)>, StoreError> {
        Ok(self
            .cases
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta_get(key))
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta_put(key, value);
        Ok(())
    }
}

impl OracleStore for NullStore {
    fn get_oracle(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.oracles.lock().unwrap().get(name).cloned())
    }

    fn put_oracle(&self, name: &str, oracle: &[u8]) -> Result<(), StoreError> {
        self.oracles
            .lock()
            .unwrap()
            .insert(name.to_string(), oracle.to_vec());
        Ok(())
    }

    fn iter_oracles(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(self
            .oracles
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta_get(key))
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta_put(key, value);
        Ok(())
    }
}

impl RewardStore for NullStore {
    fn get_member(&self, member: &MemberAddress) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.members.lock().unwrap().get(member).cloned())
    }

    fn put_member(&self, member: &MemberAddress, state: &[u8]) -> Result<(), StoreError> {
        self.members
            .lock()
            .unwrap()
            .insert(member.clone(), state.to_vec());
        Ok(())
    }

    fn iter_members(&self) -> Result<Vec<(MemberAddress, Vec<u8>)>, StoreError> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.meta_put(key.as_bytes(), value);
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta_get(key.as_bytes()))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.meta.lock().unwrap().remove(key.as_bytes());
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.meta_get(SCHEMA_VERSION_KEY) {
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
        self.meta_put(SCHEMA_VERSION_KEY, &version.to_le_bytes());
        Ok(())
    }
}
