use crate::domain::funds::{Amount, Balance};
use crate::domain::ports::{Payout, Settlement};
use crate::error::{CustodyError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Reference settlement backend.
///
/// Holds a custody pool plus a per-destination credit ledger behind
/// `Arc<RwLock<...>>` for shared access. Every disbursement is applied under
/// a single write lock, which is what makes the all-or-nothing contract of
/// [`Settlement`] hold. Ideal for testing and for the script-replay CLI.
#[derive(Default, Clone)]
pub struct InMemorySettlement {
    pool: Arc<RwLock<Pool>>,
}

#[derive(Default)]
struct Pool {
    custody: Balance,
    credits: HashMap<String, Balance>,
}

impl InMemorySettlement {
    /// Creates a new settlement backend with empty custody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value currently held in custody.
    pub async fn custody(&self) -> Balance {
        self.pool.read().await.custody
    }

    /// Total credited to `destination` so far.
    pub async fn credited(&self, destination: &str) -> Balance {
        self.pool
            .read()
            .await
            .credits
            .get(destination)
            .copied()
            .unwrap_or(Balance::ZERO)
    }

    /// All credits, ordered by destination.
    pub async fn credits(&self) -> Vec<(String, Balance)> {
        let pool = self.pool.read().await;
        let mut credits: Vec<_> = pool
            .credits
            .iter()
            .map(|(destination, balance)| (destination.clone(), *balance))
            .collect();
        credits.sort_by(|a, b| a.0.cmp(&b.0));
        credits
    }
}

#[async_trait]
impl Settlement for InMemorySettlement {
    async fn deposit(&self, amount: Amount) -> Result<()> {
        let mut pool = self.pool.write().await;
        pool.custody += Balance::from(amount);
        Ok(())
    }

    async fn transfer(&self, destination: &str, amount: Amount) -> Result<()> {
        self.disburse(&[Payout {
            destination: destination.to_string(),
            amount,
        }])
        .await
    }

    async fn disburse(&self, payouts: &[Payout]) -> Result<()> {
        let mut pool = self.pool.write().await;
        let total = payouts
            .iter()
            .fold(Balance::ZERO, |acc, p| acc + Balance::from(p.amount));
        if pool.custody < total {
            return Err(CustodyError::TransferFailed(format!(
                "custody {} cannot cover disbursement of {}",
                pool.custody, total
            )));
        }

        pool.custody -= total;
        for payout in payouts {
            *pool.credits.entry(payout.destination.clone()).or_default() +=
                Balance::from(payout.amount);
        }
        Ok(())
    }
}
