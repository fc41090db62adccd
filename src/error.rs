use crate::domain::escrow::EscrowState;
use crate::domain::funds::Amount;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CustodyError>;

#[derive(Error, Debug)]
pub enum CustodyError {
    #[error("caller is not authorized to perform this operation")]
    Unauthorized,
    #[error("unknown record id: {0}")]
    NotFound(u64),
    #[error("already confirmed by this owner")]
    AlreadyConfirmed,
    #[error("not confirmed by this owner")]
    NotConfirmed,
    #[error("transaction already executed")]
    AlreadyExecuted,
    #[error("insufficient confirmations: have {have}, need {need}")]
    InsufficientConfirmations { have: usize, need: usize },
    #[error("operation not allowed while escrow is {0}")]
    InvalidState(EscrowState),
    #[error("deposit does not match escrow amount: expected {expected}, got {got}")]
    AmountMismatch { expected: Amount, got: Amount },
    #[error("value transfer failed: {0}")]
    TransferFailed(String),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("duplicate owner: {0}")]
    DuplicateOwner(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
