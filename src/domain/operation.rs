use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Propose,
    Confirm,
    Revoke,
    Execute,
    CreateEscrow,
    Fund,
    Release,
    Dispute,
    Resolve,
}

/// One row of an operations script.
///
/// `target`, `value` and `data` are interpreted per operation kind: `target`
/// is a destination or counterparty identity for `propose`/`create_escrow`
/// and a record id elsewhere; `data` carries a payload, a description, or a
/// dispute outcome for `resolve`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OpRecord {
    pub op: OpKind,
    pub actor: String,
    pub target: Option<String>,
    pub value: Option<Decimal>,
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_operation_deserialization() {
        let csv = "op, actor, target, value, data\n\
                   propose, o1, bob, 100, payload\n\
                   confirm, o2, 0, , ";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let propose: OpRecord = iter.next().unwrap().expect("Failed to deserialize row");
        assert_eq!(propose.op, OpKind::Propose);
        assert_eq!(propose.actor, "o1");
        assert_eq!(propose.target.as_deref(), Some("bob"));
        assert_eq!(propose.value, Some(dec!(100)));
        assert_eq!(propose.data.as_deref(), Some("payload"));

        let confirm: OpRecord = iter.next().unwrap().expect("Failed to deserialize row");
        assert_eq!(confirm.op, OpKind::Confirm);
        assert_eq!(confirm.target.as_deref(), Some("0"));
        assert_eq!(confirm.value, None);
        assert_eq!(confirm.data, None);
    }

    #[test]
    fn test_escrow_kinds_use_snake_case() {
        let csv = "op, actor, target, value, data\n\
                   create_escrow, alice, bob, 1000, laptop";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let row: OpRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.op, OpKind::CreateEscrow);
    }
}
