use crate::domain::escrow::{DisputeOutcome, EscrowRecord, EscrowState};
use crate::domain::funds::{Amount, BPS_SCALE, Balance};
use crate::domain::ports::{Payout, Settlement};
use crate::error::{CustodyError, Result};
use std::sync::Arc;

/// The custodian of escrowed deposits.
///
/// Owns the escrow log and a running custody counter equal to the sum of
/// `amount` over records in `Funded` or `Disputed` state. Mutating operations
/// take `&mut self` and validate every precondition before touching state;
/// disbursements go through a single [`Settlement::disburse`] call so the
/// principal and the fee can never half-apply.
pub struct EscrowEngine {
    fee_rate_bps: u16,
    fee_account: String,
    arbiter: String,
    escrows: Vec<EscrowRecord>,
    custody: Balance,
    settlement: Arc<dyn Settlement>,
}

impl EscrowEngine {
    pub fn new(
        fee_rate_bps: u16,
        fee_account: String,
        arbiter: String,
        settlement: Arc<dyn Settlement>,
    ) -> Result<Self> {
        if fee_rate_bps > BPS_SCALE {
            return Err(CustodyError::Validation(format!(
                "fee rate {fee_rate_bps} exceeds {BPS_SCALE} basis points"
            )));
        }
        Ok(Self {
            fee_rate_bps,
            fee_account,
            arbiter,
            escrows: Vec::new(),
            custody: Balance::ZERO,
            settlement,
        })
    }

    fn record(&self, id: u64) -> Result<&EscrowRecord> {
        self.escrows.get(id as usize).ok_or(CustodyError::NotFound(id))
    }

    fn record_mut(&mut self, id: u64) -> Result<&mut EscrowRecord> {
        self.escrows
            .get_mut(id as usize)
            .ok_or(CustodyError::NotFound(id))
    }

    fn with_fee(&self, mut payouts: Vec<Payout>, fee: Amount) -> Vec<Payout> {
        if fee > Amount::ZERO {
            payouts.push(Payout {
                destination: self.fee_account.clone(),
                amount: fee,
            });
        }
        payouts.retain(|p| p.amount > Amount::ZERO);
        payouts
    }

    /// Open an escrow; the caller becomes the buyer. No funds are held yet.
    pub fn create(
        &mut self,
        caller: &str,
        seller: &str,
        description: &str,
        amount: Amount,
    ) -> Result<u64> {
        if caller == seller {
            return Err(CustodyError::Validation(
                "buyer and seller must be distinct".to_string(),
            ));
        }

        let id = self.escrows.len() as u64;
        self.escrows.push(EscrowRecord::new(
            id,
            caller.to_string(),
            seller.to_string(),
            description.to_string(),
            amount,
            self.fee_rate_bps,
        ));
        log::debug!("escrow {id} created: {caller} -> {seller} for {amount}");
        Ok(id)
    }

    /// Deposit the agreed amount into custody.
    ///
    /// The deposit must match the amount fixed at creation exactly.
    pub async fn fund(&mut self, caller: &str, id: u64, deposited: Amount) -> Result<()> {
        let record = self.record(id)?;
        if record.buyer != caller {
            return Err(CustodyError::Unauthorized);
        }
        if record.state != EscrowState::Created {
            return Err(CustodyError::InvalidState(record.state));
        }
        if deposited != record.amount {
            return Err(CustodyError::AmountMismatch {
                expected: record.amount,
                got: deposited,
            });
        }

        let amount = record.amount;
        self.settlement.deposit(amount).await?;
        self.record_mut(id)?.state = EscrowState::Funded;
        self.custody += Balance::from(amount);
        log::info!("escrow {id} funded with {amount}");
        Ok(())
    }

    /// Release a funded escrow to the seller, deducting the service fee.
    ///
    /// Only the buyer authorizes release. On settlement failure the record
    /// stays `Funded` and the call may be retried.
    pub async fn release(&mut self, caller: &str, id: u64) -> Result<()> {
        let record = self.record(id)?;
        if record.buyer != caller {
            return Err(CustodyError::Unauthorized);
        }
        if record.state != EscrowState::Funded {
            return Err(CustodyError::InvalidState(record.state));
        }

        let amount = record.amount;
        let fee = amount.fee(record.fee_rate_bps);
        let net = amount.net_of_fee(record.fee_rate_bps);
        let payouts = self.with_fee(
            vec![Payout {
                destination: record.seller.clone(),
                amount: net,
            }],
            fee,
        );

        self.settlement.disburse(&payouts).await?;
        self.record_mut(id)?.state = EscrowState::Released;
        self.custody -= Balance::from(amount);
        log::info!("escrow {id} released: {net} to seller, {fee} fee");
        Ok(())
    }

    /// Freeze a funded escrow pending arbitration.
    ///
    /// Either party may raise the dispute; release is no longer callable
    /// until an arbiter resolves it.
    pub fn dispute(&mut self, caller: &str, id: u64) -> Result<()> {
        let record = self.record_mut(id)?;
        if !record.is_party(caller) {
            return Err(CustodyError::Unauthorized);
        }
        if record.state != EscrowState::Funded {
            return Err(CustodyError::InvalidState(record.state));
        }

        record.state = EscrowState::Disputed;
        log::info!("escrow {id} disputed by {caller}");
        Ok(())
    }

    /// Disburse a disputed escrow per the arbiter's outcome.
    ///
    /// The service fee is charged with the same formula as release; a split
    /// gives the buyer their basis-point share of the net and the seller the
    /// exact remainder. `Resolved` is terminal.
    pub async fn resolve(&mut self, caller: &str, id: u64, outcome: DisputeOutcome) -> Result<()> {
        if caller != self.arbiter {
            return Err(CustodyError::Unauthorized);
        }
        if let DisputeOutcome::Split { buyer_bps } = outcome {
            if buyer_bps > BPS_SCALE {
                return Err(CustodyError::Validation(format!(
                    "split ratio {buyer_bps} exceeds {BPS_SCALE} basis points"
                )));
            }
        }

        let record = self.record(id)?;
        if record.state != EscrowState::Disputed {
            return Err(CustodyError::InvalidState(record.state));
        }

        let amount = record.amount;
        let fee = amount.fee(record.fee_rate_bps);
        let net = amount.net_of_fee(record.fee_rate_bps);
        let legs = match outcome {
            DisputeOutcome::ToBuyer => vec![Payout {
                destination: record.buyer.clone(),
                amount: net,
            }],
            DisputeOutcome::ToSeller => vec![Payout {
                destination: record.seller.clone(),
                amount: net,
            }],
            DisputeOutcome::Split { buyer_bps } => {
                let to_buyer = net.share(buyer_bps);
                let to_seller = net - to_buyer;
                vec![
                    Payout {
                        destination: record.buyer.clone(),
                        amount: to_buyer,
                    },
                    Payout {
                        destination: record.seller.clone(),
                        amount: to_seller,
                    },
                ]
            }
        };
        let payouts = self.with_fee(legs, fee);

        self.settlement.disburse(&payouts).await?;
        self.record_mut(id)?.state = EscrowState::Resolved;
        self.custody -= Balance::from(amount);
        log::info!("escrow {id} resolved by {caller}");
        Ok(())
    }

    /// True iff `identity` is the buyer or the seller of the given escrow.
    pub fn is_party(&self, id: u64, identity: &str) -> Result<bool> {
        Ok(self.record(id)?.is_party(identity))
    }

    /// Service fee in basis points.
    pub fn fee_rate(&self) -> u16 {
        self.fee_rate_bps
    }

    /// Count of created escrows, terminal ones included.
    pub fn escrow_count(&self) -> usize {
        self.escrows.len()
    }

    /// Value currently held on behalf of funded and disputed escrows.
    pub fn custody_balance(&self) -> Balance {
        self.custody
    }

    pub fn escrow(&self, id: u64) -> Result<&EscrowRecord> {
        self.record(id)
    }

    pub fn escrows(&self) -> &[EscrowRecord] {
        &self.escrows
    }
}
