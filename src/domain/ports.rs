use crate::domain::funds::Amount;
use crate::error::Result;
use async_trait::async_trait;

/// A single payout leg of a disbursement.
#[derive(Debug, Clone, PartialEq)]
pub struct Payout {
    pub destination: String,
    pub amount: Amount,
}

/// The settlement layer moving custodied value.
///
/// Every call is all-or-nothing: either the full amount moves, or the call
/// fails and leaves every balance unchanged. Both engines rely on this
/// contract to keep their own state machines consistent.
#[async_trait]
pub trait Settlement: Send + Sync {
    /// Takes `amount` into custody.
    async fn deposit(&self, amount: Amount) -> Result<()>;

    /// Moves `amount` out of custody to `destination`.
    async fn transfer(&self, destination: &str, amount: Amount) -> Result<()>;

    /// Applies every payout, or none of them.
    async fn disburse(&self, payouts: &[Payout]) -> Result<()>;
}
