//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `EscrowEngine`, the single-slot state machine that
//! owns the escrow log and drives conversion and payout through the domain
//! ports. Every public call runs to completion before the next one starts.

pub mod engine;
