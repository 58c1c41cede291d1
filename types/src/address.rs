//! Member address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque member identity as issued by the embedding platform.
///
/// Addresses arrive over the transport boundary already derived (the ledger
/// never touches key material), so the only structural requirement is that
/// they are non-empty printable ASCII without whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberAddress(String);

impl MemberAddress {
    /// Create a new member address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.is_empty(), "member address must not be empty");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    ///
    /// Serde construction bypasses [`new`], so boundary code must call this
    /// before trusting an inbound address.
    ///
    /// [`new`]: MemberAddress::new
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_graphic())
    }
}

impl fmt::Display for MemberAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MemberAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
