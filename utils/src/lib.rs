//! Shared utilities for the tribunal dispute and reward ledger.

pub mod logging;
pub mod stats;

pub use logging::init_tracing;
pub use stats::StatsCounter;
