//! LMDB storage backend for the tribunal ledger.
//!
//! Implements the storage traits from `tribunal-store` using the `heed`
//! LMDB bindings. All stores share one environment; cases, oracles, and
//! member rewards each get their own named database, while every engine's
//! metadata lands in a single shared `meta` database — key collisions
//! between engines are therefore real and the keys are namespaced by
//! convention (`subject_sequences`, `activity_params`, …).

pub mod case;
pub mod environment;
pub mod error;
pub mod meta;
pub mod oracle;
pub mod reward;

pub use case::LmdbCaseStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use meta::LmdbMetaStore;
pub use oracle::LmdbOracleStore;
pub use reward::LmdbRewardStore;
