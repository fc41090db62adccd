use crate::domain::escrow::EscrowRecord;
use crate::domain::funds::Balance;
use crate::domain::wallet::TransactionRecord;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CreditRow {
    account: String,
    credited: Decimal,
}

#[derive(Serialize)]
struct EscrowRow {
    escrow: u64,
    buyer: String,
    seller: String,
    amount: Decimal,
    state: String,
}

#[derive(Serialize)]
struct TransactionRow {
    transaction: u64,
    destination: String,
    value: Decimal,
    confirmations: usize,
    executed: bool,
}

/// Writes the final ledger state as CSV blocks: settlement credits, the
/// escrow log, and the transaction log.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_report(
        &mut self,
        credits: &[(String, Balance)],
        escrows: &[EscrowRecord],
        transactions: &[TransactionRecord],
    ) -> Result<()> {
        if !credits.is_empty() {
            let mut writer = csv::Writer::from_writer(&mut self.out);
            for (account, balance) in credits {
                writer.serialize(CreditRow {
                    account: account.clone(),
                    credited: balance.0.normalize(),
                })?;
            }
            writer.flush()?;
        }

        if !escrows.is_empty() {
            writeln!(self.out)?;
            let mut writer = csv::Writer::from_writer(&mut self.out);
            for record in escrows {
                writer.serialize(EscrowRow {
                    escrow: record.id,
                    buyer: record.buyer.clone(),
                    seller: record.seller.clone(),
                    amount: record.amount.value().normalize(),
                    state: record.state.to_string(),
                })?;
            }
            writer.flush()?;
        }

        if !transactions.is_empty() {
            writeln!(self.out)?;
            let mut writer = csv::Writer::from_writer(&mut self.out);
            for record in transactions {
                writer.serialize(TransactionRow {
                    transaction: record.id,
                    destination: record.destination.clone(),
                    value: record.value.value().normalize(),
                    confirmations: record.confirmation_count(),
                    executed: record.executed,
                })?;
            }
            writer.flush()?;
        }

        Ok(())
    }
}
