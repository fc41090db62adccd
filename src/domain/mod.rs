pub mod escrow;
pub mod funds;
pub mod operation;
pub mod ports;
pub mod wallet;
