//! Case lifecycle engine.
//!
//! Three kinds of case share one shape: job disputes, skill-verification
//! applications, and advisory questions. Each is created against an active
//! oracle, collects weighted votes during a fixed window, and settles
//! exactly once — the raiser needs a strict majority, the fee pool is split
//! among winning voters in proportion to weight, and per-kind effects
//! (escrow release, oracle admission) are returned as instructions for the
//! service layer to execute.

pub mod case;
pub mod distribution;
pub mod engine;
pub mod error;

pub use case::{Case, VoteRecord};
pub use distribution::{distribute_fee, FeeShare};
pub use engine::{CaseEngine, FundsInstruction, SettlementOutcome};
pub use error::CaseError;
