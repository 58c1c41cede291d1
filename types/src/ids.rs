//! Identifier newtypes for subjects and cases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a case is raised about: a job id for disputes, an application hash
/// for skill verification, a question hash for advisory cases.
///
/// Opaque to the ledger. Subjects raised from another chain conventionally
/// embed their origin in the string; the ledger never parses it, only echoes
/// it back when relaying results.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique case identifier: the subject plus a per-subject sequence number.
///
/// The same subject can be contested more than once; the sequence number
/// keeps every case distinct while staying derivable from public state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    /// Derive the id of the `seq`-th case raised about `subject`.
    pub fn derive(subject: &SubjectId, seq: u64) -> Self {
        Self(format!("{}-{}", subject.as_str(), seq))
    }

    /// Rebuild an id from its stored string form, e.g. a storage key read
    /// back from disk. Only meaningful for strings produced by [`derive`].
    ///
    /// [`derive`]: CaseId::derive
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
