//! Nullable transport — record settlement notices without relaying them.

use std::sync::Mutex;
use tribunal_messages::{ResultTransport, SettlementNotice, TransportError};

/// A transport that records outbound notices instead of sending them.
pub struct NullTransport {
    sent: Mutex<Vec<SettlementNotice>>,
    fail_all: bool,
}

impl NullTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_all: false,
        }
    }

    /// A transport that drops every notice with an error, for exercising
    /// the relay-failure path.
    pub fn unreachable() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }

    /// All notices "sent" so far (for assertions).
    pub fn sent(&self) -> Vec<SettlementNotice> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTransport for NullTransport {
    fn relay_settlement(&self, notice: &SettlementNotice) -> Result<(), TransportError> {
        if self.fail_all {
            return Err(TransportError::Unreachable("null transport".into()));
        }
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}
