//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `MultiSigLedger` for threshold-authorized wallet
//! transfers and the `EscrowEngine` for custodied deposits, plus the
//! `CustodyService` that routes script operations to both engines.

pub mod escrow;
pub mod service;
pub mod wallet;
