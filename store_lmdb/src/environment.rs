//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::case::LmdbCaseStore;
use crate::error::LmdbError;
use crate::meta::LmdbMetaStore;
use crate::oracle::LmdbOracleStore;
use crate::reward::LmdbRewardStore;

const CASES_DB: &str = "cases";
const ORACLES_DB: &str = "oracles";
const MEMBERS_DB: &str = "members";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
///
/// Open once per process per data directory; the store handles it hands
/// out are cheap to create and safe to share across threads.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    cases_db: Database<Bytes, Bytes>,
    oracles_db: Database<Bytes, Bytes>,
    members_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Open(e.to_string()))?;
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(max_dbs)
                .map_size(map_size)
                .open(path)
                .map_err(|e| LmdbError::Open(e.to_string()))?
        };

        let mut txn = env.write_txn().map_err(|e| LmdbError::Open(e.to_string()))?;
        let cases_db = create_db(&env, &mut txn, CASES_DB)?;
        let oracles_db = create_db(&env, &mut txn, ORACLES_DB)?;
        let members_db = create_db(&env, &mut txn, MEMBERS_DB)?;
        let meta_db = create_db(&env, &mut txn, META_DB)?;
        txn.commit().map_err(|e| LmdbError::Open(e.to_string()))?;

        Ok(Self {
            env: Arc::new(env),
            cases_db,
            oracles_db,
            members_db,
            meta_db,
        })
    }

    pub fn case_store(&self) -> LmdbCaseStore {
        LmdbCaseStore::new(self.env.clone(), self.cases_db, self.meta_db)
    }

    pub fn oracle_store(&self) -> LmdbOracleStore {
        LmdbOracleStore::new(self.env.clone(), self.oracles_db, self.meta_db)
    }

    pub fn reward_store(&self) -> LmdbRewardStore {
        LmdbRewardStore::new(self.env.clone(), self.members_db)
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore::new(self.env.clone(), self.meta_db)
    }
}

fn create_db(
    env: &Env,
    txn: &mut heed::RwTxn,
    name: &'static str,
) -> Result<Database<Bytes, Bytes>, LmdbError> {
    env.create_database(txn, Some(name))
        .map_err(|e| LmdbError::CreateDatabase {
            name,
            source_msg: e.to_string(),
        })
}
