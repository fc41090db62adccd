use crate::domain::funds::{Amount, BPS_SCALE};
use crate::error::{CustodyError, Result};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an escrowed deposit.
///
/// `Released` and `Resolved` are terminal; no transition skips a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowState {
    Created,
    Funded,
    Released,
    Disputed,
    Resolved,
}

impl fmt::Display for EscrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            EscrowState::Created => "created",
            EscrowState::Funded => "funded",
            EscrowState::Released => "released",
            EscrowState::Disputed => "disputed",
            EscrowState::Resolved => "resolved",
        };
        f.write_str(state)
    }
}

/// How a disputed escrow's funds are disbursed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeOutcome {
    ToBuyer,
    ToSeller,
    /// `buyer_bps` is the buyer's share of the net payout in basis points;
    /// the seller receives the exact remainder.
    Split { buyer_bps: u16 },
}

impl DisputeOutcome {
    pub fn split(buyer_bps: u16) -> Result<Self> {
        if buyer_bps > BPS_SCALE {
            return Err(CustodyError::Validation(format!(
                "split ratio {buyer_bps} exceeds {BPS_SCALE} basis points"
            )));
        }
        Ok(Self::Split { buyer_bps })
    }
}

impl FromStr for DisputeOutcome {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(bps) = s.strip_prefix("split:") {
            let bps: u16 = bps
                .parse()
                .map_err(|_| CustodyError::Validation(format!("invalid split ratio: {s}")))?;
            return Self::split(bps);
        }
        match s {
            "buyer" => Ok(Self::ToBuyer),
            "seller" => Ok(Self::ToSeller),
            other => Err(CustodyError::Validation(format!(
                "unknown dispute outcome: {other}"
            ))),
        }
    }
}

/// An escrowed deposit between a buyer and a seller.
///
/// `amount` and `fee_rate_bps` are fixed at creation; records are never
/// deleted, terminal states retain history.
#[derive(Debug, Clone)]
pub struct EscrowRecord {
    pub id: u64,
    pub buyer: String,
    pub seller: String,
    pub description: String,
    pub amount: Amount,
    pub state: EscrowState,
    pub fee_rate_bps: u16,
}

impl EscrowRecord {
    pub fn new(
        id: u64,
        buyer: String,
        seller: String,
        description: String,
        amount: Amount,
        fee_rate_bps: u16,
    ) -> Self {
        Self {
            id,
            buyer,
            seller,
            description,
            amount,
            state: EscrowState::Created,
            fee_rate_bps,
        }
    }

    /// True iff `identity` is the buyer or the seller of this record.
    pub fn is_party(&self, identity: &str) -> bool {
        identity == self.buyer || identity == self.seller
    }

    /// True while the record's `amount` is attributed to the custody balance.
    pub fn holds_funds(&self) -> bool {
        matches!(self.state, EscrowState::Funded | EscrowState::Disputed)
    }
}
