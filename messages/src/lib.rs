//! Data structures crossing the cross-chain transport boundary.
//!
//! The transport layer owns serialization, addressing, and delivery; these
//! types only fix the shape of what crosses. Inbound messages are applied
//! by the service, outbound settlement notices are handed to a
//! [`ResultTransport`] which relays them to the subject's origin chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tribunal_types::{
    CaseId, CaseKind, CurrencyAmount, MemberAddress, SubjectId, Timestamp, WinningSide,
};

/// A call delivered from another chain.
///
/// Addresses inside arrive unvalidated; the service checks them before
/// acting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum InboundMessage {
    /// Open a case on behalf of a raiser on the origin chain.
    CreateCase {
        subject: SubjectId,
        kind: CaseKind,
        oracle: String,
        evidence: String,
        fee: CurrencyAmount,
        disputed_amount: CurrencyAmount,
        raiser: MemberAddress,
    },
    /// A qualifying governance action a member performed elsewhere.
    GovernanceAction { member: MemberAddress },
}

/// One winning voter's cut, addressed to their registered claim address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterShare {
    pub claim_address: MemberAddress,
    pub amount: CurrencyAmount,
}

/// A settlement result bound for the origin chain of the case's subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementNotice {
    pub case_id: CaseId,
    pub subject: SubjectId,
    pub kind: CaseKind,
    pub winning_side: WinningSide,
    pub votes_for: u128,
    pub votes_against: u128,
    /// Empty when the case closed with zero votes.
    pub shares: Vec<VoterShare>,
    /// The fee returned to the raiser on a zero-vote close.
    pub fee_refunded: Option<CurrencyAmount>,
    pub settled_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unreachable: {0}")]
    Unreachable(String),

    #[error("message rejected by transport: {0}")]
    Rejected(String),
}

/// Outbound half of the transport boundary.
///
/// Implementations route the notice to wherever the subject originated.
/// Delivery is fire-and-forget from the ledger's point of view; a failed
/// relay never unwinds a committed settlement.
pub trait ResultTransport {
    fn relay_settlement(&self, notice: &SettlementNotice) -> Result<(), TransportError>;
}
