//! Collaborator traits for the platform contracts around the ledger.
//!
//! The dispute and reward ledger does not own stakes, escrowed funds or
//! member profiles. It reads them (voting power, referrers) and instructs
//! them (fund releases, refunds) through the traits here; the embedding
//! application supplies the implementations. Everything is synchronous: a
//! collaborator call happens inside an indivisible ledger operation.

pub mod error;
pub mod escrow;
pub mod profile;
pub mod stake;

pub use error::RegistryError;
pub use escrow::Escrow;
pub use profile::ProfileRegistry;
pub use stake::{StakeInfo, StakeRegistry};
