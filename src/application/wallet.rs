use crate::domain::funds::Amount;
use crate::domain::ports::Settlement;
use crate::domain::wallet::{OwnerSet, TransactionRecord};
use crate::error::{CustodyError, Result};
use std::sync::Arc;

/// The ledger of proposed wallet transfers and their confirmation state.
///
/// Every mutating operation takes `&mut self`, which serializes check-and-set
/// sequences: no interleaved call can observe a half-applied mutation, and the
/// `executed` flag can flip `false -> true` at most once per record. The only
/// suspension point is the settlement call inside [`execute`](Self::execute);
/// the flag commits strictly after the settlement reports success.
pub struct MultiSigLedger {
    owners: OwnerSet,
    transactions: Vec<TransactionRecord>,
    settlement: Arc<dyn Settlement>,
}

impl MultiSigLedger {
    pub fn new(owners: OwnerSet, settlement: Arc<dyn Settlement>) -> Self {
        Self {
            owners,
            transactions: Vec::new(),
            settlement,
        }
    }

    fn require_owner(&self, caller: &str) -> Result<()> {
        if self.owners.contains(caller) {
            Ok(())
        } else {
            Err(CustodyError::Unauthorized)
        }
    }

    fn record(&self, id: u64) -> Result<&TransactionRecord> {
        self.transactions
            .get(id as usize)
            .ok_or(CustodyError::NotFound(id))
    }

    fn record_mut(&mut self, id: u64) -> Result<&mut TransactionRecord> {
        self.transactions
            .get_mut(id as usize)
            .ok_or(CustodyError::NotFound(id))
    }

    /// Propose a transfer of `value` to `destination`.
    ///
    /// The proposer is not implicitly counted as a confirmer; every approval
    /// is a separate [`confirm`](Self::confirm) call.
    pub fn propose(
        &mut self,
        caller: &str,
        destination: &str,
        value: Amount,
        payload: Vec<u8>,
    ) -> Result<u64> {
        self.require_owner(caller)?;

        let id = self.transactions.len() as u64;
        self.transactions.push(TransactionRecord::new(
            id,
            destination.to_string(),
            value,
            payload,
        ));
        log::debug!("transaction {id} proposed by {caller}: {value} to {destination}");
        Ok(id)
    }

    /// Add the caller's confirmation to a pending transaction.
    pub fn confirm(&mut self, caller: &str, id: u64) -> Result<()> {
        self.require_owner(caller)?;
        self.record_mut(id)?.confirm(caller)?;
        log::debug!("transaction {id} confirmed by {caller}");
        Ok(())
    }

    /// Withdraw the caller's confirmation from a pending transaction.
    pub fn revoke(&mut self, caller: &str, id: u64) -> Result<()> {
        self.require_owner(caller)?;
        self.record_mut(id)?.revoke(caller)?;
        log::debug!("transaction {id} confirmation revoked by {caller}");
        Ok(())
    }

    /// Execute a transaction that has reached the confirmation threshold.
    ///
    /// Any owner may trigger execution, not just confirmers. The threshold is
    /// re-evaluated here rather than latched when confirmations arrive, so a
    /// revocation between reaching the threshold and this call still blocks
    /// execution. On settlement failure the record stays unexecuted and the
    /// call may be retried.
    pub async fn execute(&mut self, caller: &str, id: u64) -> Result<()> {
        self.require_owner(caller)?;

        let record = self.record(id)?;
        if record.executed {
            return Err(CustodyError::AlreadyExecuted);
        }
        let have = record.confirmation_count();
        let need = self.owners.threshold();
        if have < need {
            return Err(CustodyError::InsufficientConfirmations { have, need });
        }

        let destination = record.destination.clone();
        let value = record.value;
        self.settlement.transfer(&destination, value).await?;
        self.record_mut(id)?.executed = true;
        log::info!("transaction {id} executed: {value} to {destination}");
        Ok(())
    }

    /// Check whether an identity is a registered owner.
    pub fn is_owner(&self, identity: &str) -> bool {
        self.owners.contains(identity)
    }

    /// Owners in construction order.
    pub fn owners(&self) -> &[String] {
        self.owners.owners()
    }

    pub fn threshold(&self) -> usize {
        self.owners.threshold()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transaction(&self, id: u64) -> Result<&TransactionRecord> {
        self.record(id)
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }
}
