//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the ledger (clock, storage, platform
//! collaborators, transport) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod registry;
pub mod store;
pub mod transport;

pub use clock::NullClock;
pub use registry::{NullEscrow, NullProfiles, NullStakeRegistry};
pub use store::NullStore;
pub use transport::NullTransport;
