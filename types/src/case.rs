//! Case classification and outcome enums shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a case is about, which determines what settlement does beyond
/// distributing the fee pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKind {
    /// A contested job: settlement releases the disputed funds to the
    /// winning side.
    Dispute,
    /// A skill-verification application: approval adds the applicant to the
    /// target oracle. No funds are moved besides the fee pool.
    SkillVerification,
    /// An advisory question: the outcome is recorded and the fee is
    /// distributed, nothing else.
    Advisory,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseKind::Dispute => "dispute",
            CaseKind::SkillVerification => "skill-verification",
            CaseKind::Advisory => "advisory",
        };
        write!(f, "{s}")
    }
}

/// Which way a vote goes. `For` sides with the raiser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    For,
    Against,
}

/// The side a finalized case resolved in favor of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinningSide {
    Raiser,
    Counterparty,
}

impl fmt::Display for WinningSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WinningSide::Raiser => "raiser",
            WinningSide::Counterparty => "counterparty",
        };
        write!(f, "{s}")
    }
}
