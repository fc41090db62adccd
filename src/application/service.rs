use crate::application::escrow::EscrowEngine;
use crate::application::wallet::MultiSigLedger;
use crate::domain::escrow::DisputeOutcome;
use crate::domain::funds::Amount;
use crate::domain::operation::{OpKind, OpRecord};
use crate::error::{CustodyError, Result};
use rust_decimal::Decimal;

/// Outcome of one applied script operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Transaction(u64),
    Escrow(u64),
    Done,
}

/// Routes script operations to the wallet ledger and the escrow engine.
pub struct CustodyService {
    pub wallet: MultiSigLedger,
    pub escrow: EscrowEngine,
}

impl CustodyService {
    pub fn new(wallet: MultiSigLedger, escrow: EscrowEngine) -> Self {
        Self { wallet, escrow }
    }

    /// Apply one operation row against the owning engine.
    pub async fn apply(&mut self, rec: OpRecord) -> Result<Applied> {
        match rec.op {
            OpKind::Propose => {
                let destination = require(rec.target, "destination")?;
                let value = amount_of(rec.value)?;
                let payload = rec.data.unwrap_or_default().into_bytes();
                let id = self.wallet.propose(&rec.actor, &destination, value, payload)?;
                Ok(Applied::Transaction(id))
            }
            OpKind::Confirm => {
                self.wallet.confirm(&rec.actor, record_id(rec.target)?)?;
                Ok(Applied::Done)
            }
            OpKind::Revoke => {
                self.wallet.revoke(&rec.actor, record_id(rec.target)?)?;
                Ok(Applied::Done)
            }
            OpKind::Execute => {
                self.wallet.execute(&rec.actor, record_id(rec.target)?).await?;
                Ok(Applied::Done)
            }
            OpKind::CreateEscrow => {
                let seller = require(rec.target, "seller")?;
                let amount = amount_of(rec.value)?;
                let description = rec.data.unwrap_or_default();
                let id = self.escrow.create(&rec.actor, &seller, &description, amount)?;
                Ok(Applied::Escrow(id))
            }
            OpKind::Fund => {
                let id = record_id(rec.target)?;
                let deposited = amount_of(rec.value)?;
                self.escrow.fund(&rec.actor, id, deposited).await?;
                Ok(Applied::Done)
            }
            OpKind::Release => {
                self.escrow.release(&rec.actor, record_id(rec.target)?).await?;
                Ok(Applied::Done)
            }
            OpKind::Dispute => {
                self.escrow.dispute(&rec.actor, record_id(rec.target)?)?;
                Ok(Applied::Done)
            }
            OpKind::Resolve => {
                let id = record_id(rec.target)?;
                let outcome: DisputeOutcome = require(rec.data, "outcome")?.parse()?;
                self.escrow.resolve(&rec.actor, id, outcome).await?;
                Ok(Applied::Done)
            }
        }
    }
}

fn require(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| CustodyError::Validation(format!("operation requires a {name}")))
}

fn record_id(target: Option<String>) -> Result<u64> {
    let target = require(target, "record id")?;
    target
        .parse()
        .map_err(|_| CustodyError::Validation(format!("invalid record id: {target}")))
}

fn amount_of(value: Option<Decimal>) -> Result<Amount> {
    let value =
        value.ok_or_else(|| CustodyError::Validation("operation requires an amount".to_string()))?;
    Amount::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::escrow::EscrowState;
    use crate::domain::funds::Balance;
    use crate::domain::ports::Settlement;
    use crate::domain::wallet::OwnerSet;
    use crate::infrastructure::in_memory::InMemorySettlement;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn op(
        kind: OpKind,
        actor: &str,
        target: Option<&str>,
        value: Option<Decimal>,
        data: Option<&str>,
    ) -> OpRecord {
        OpRecord {
            op: kind,
            actor: actor.to_string(),
            target: target.map(str::to_string),
            value,
            data: data.map(str::to_string),
        }
    }

    async fn service() -> (CustodyService, Arc<InMemorySettlement>) {
        let settlement = Arc::new(InMemorySettlement::new());
        settlement
            .deposit(Amount::new(dec!(500)).unwrap())
            .await
            .unwrap();

        let owners = OwnerSet::new(
            vec!["o1".to_string(), "o2".to_string(), "o3".to_string()],
            2,
        )
        .unwrap();
        let port: Arc<dyn Settlement> = settlement.clone();
        let wallet = MultiSigLedger::new(owners, port.clone());
        let escrow =
            EscrowEngine::new(250, "fees".to_string(), "arbiter".to_string(), port).unwrap();
        (CustodyService::new(wallet, escrow), settlement)
    }

    #[tokio::test]
    async fn test_routes_wallet_flow() {
        let (mut service, settlement) = service().await;

        let applied = service
            .apply(op(OpKind::Propose, "o1", Some("bob"), Some(dec!(100)), None))
            .await
            .unwrap();
        assert_eq!(applied, Applied::Transaction(0));

        service
            .apply(op(OpKind::Confirm, "o1", Some("0"), None, None))
            .await
            .unwrap();
        service
            .apply(op(OpKind::Confirm, "o2", Some("0"), None, None))
            .await
            .unwrap();
        service
            .apply(op(OpKind::Execute, "o3", Some("0"), None, None))
            .await
            .unwrap();

        assert!(service.wallet.transaction(0).unwrap().executed);
        assert_eq!(settlement.credited("bob").await, Balance::new(dec!(100)));
    }

    #[tokio::test]
    async fn test_routes_escrow_flow() {
        let (mut service, settlement) = service().await;

        let applied = service
            .apply(op(
                OpKind::CreateEscrow,
                "alice",
                Some("bob"),
                Some(dec!(1000)),
                Some("laptop"),
            ))
            .await
            .unwrap();
        assert_eq!(applied, Applied::Escrow(0));

        service
            .apply(op(OpKind::Fund, "alice", Some("0"), Some(dec!(1000)), None))
            .await
            .unwrap();
        service
            .apply(op(OpKind::Dispute, "bob", Some("0"), None, None))
            .await
            .unwrap();
        service
            .apply(op(OpKind::Resolve, "arbiter", Some("0"), None, Some("split:5000")))
            .await
            .unwrap();

        assert_eq!(service.escrow.escrow(0).unwrap().state, EscrowState::Resolved);
        assert_eq!(settlement.credited("alice").await, Balance::new(dec!(487)));
        assert_eq!(settlement.credited("bob").await, Balance::new(dec!(488)));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let (mut service, _) = service().await;

        assert!(matches!(
            service
                .apply(op(OpKind::Propose, "o1", None, Some(dec!(100)), None))
                .await,
            Err(CustodyError::Validation(_))
        ));
        assert!(matches!(
            service
                .apply(op(OpKind::Propose, "o1", Some("bob"), None, None))
                .await,
            Err(CustodyError::Validation(_))
        ));
        assert!(matches!(
            service.apply(op(OpKind::Confirm, "o1", None, None, None)).await,
            Err(CustodyError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_record_id_rejected() {
        let (mut service, _) = service().await;

        assert!(matches!(
            service
                .apply(op(OpKind::Execute, "o1", Some("first"), None, None))
                .await,
            Err(CustodyError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_requires_outcome() {
        let (mut service, _) = service().await;

        assert!(matches!(
            service
                .apply(op(OpKind::Resolve, "arbiter", Some("0"), None, None))
                .await,
            Err(CustodyError::Validation(_))
        ));
    }
}
