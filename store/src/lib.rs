//! Abstract storage traits for the tribunal ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod case;
pub mod error;
pub mod meta;
pub mod oracle;
pub mod reward;

pub use case::CaseStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use oracle::OracleStore;
pub use reward::RewardStore;
