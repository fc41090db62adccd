use crate::domain::funds::Amount;
use crate::error::{CustodyError, Result};
use std::collections::BTreeSet;

/// The fixed owner roster and confirmation threshold of the shared wallet.
///
/// Immutable after construction; owner-management extensions are handled by
/// governance outside this core.
#[derive(Debug, Clone)]
pub struct OwnerSet {
    owners: Vec<String>,
    threshold: usize,
}

impl OwnerSet {
    /// Create an owner set, validating the roster and the threshold.
    ///
    /// # Errors
    /// Returns an error if the roster is empty, contains a duplicate identity,
    /// or the threshold falls outside `1..=owners.len()`.
    pub fn new(owners: Vec<String>, threshold: usize) -> Result<Self> {
        if owners.is_empty() {
            return Err(CustodyError::InvalidThreshold(
                "owner set must not be empty".to_string(),
            ));
        }

        for (i, owner) in owners.iter().enumerate() {
            if owners[..i].contains(owner) {
                return Err(CustodyError::DuplicateOwner(owner.clone()));
            }
        }

        if threshold == 0 || threshold > owners.len() {
            return Err(CustodyError::InvalidThreshold(format!(
                "threshold {} out of range 1..={}",
                threshold,
                owners.len()
            )));
        }

        Ok(Self { owners, threshold })
    }

    /// Check whether an identity is a registered owner.
    pub fn contains(&self, identity: &str) -> bool {
        self.owners.iter().any(|o| o == identity)
    }

    /// Owners in construction order.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.owners.len())
    }
}

/// A proposed wallet transfer accumulating owner confirmations.
///
/// Mutated only through [`confirm`](Self::confirm) and
/// [`revoke`](Self::revoke) until executed, then immutable.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: u64,
    pub destination: String,
    pub value: Amount,
    pub payload: Vec<u8>,
    pub confirmations: BTreeSet<String>,
    pub executed: bool,
}

impl TransactionRecord {
    pub fn new(id: u64, destination: String, value: Amount, payload: Vec<u8>) -> Self {
        Self {
            id,
            destination,
            value,
            payload,
            confirmations: BTreeSet::new(),
            executed: false,
        }
    }

    /// Record `owner`'s confirmation.
    pub fn confirm(&mut self, owner: &str) -> Result<()> {
        if self.executed {
            return Err(CustodyError::AlreadyExecuted);
        }
        if !self.confirmations.insert(owner.to_string()) {
            return Err(CustodyError::AlreadyConfirmed);
        }
        Ok(())
    }

    /// Withdraw `owner`'s confirmation.
    pub fn revoke(&mut self, owner: &str) -> Result<()> {
        if self.executed {
            return Err(CustodyError::AlreadyExecuted);
        }
        if !self.confirmations.remove(owner) {
            return Err(CustodyError::NotConfirmed);
        }
        Ok(())
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.len()
    }

    pub fn is_confirmed_by(&self, identity: &str) -> bool {
        self.confirmations.contains(identity)
    }
}
