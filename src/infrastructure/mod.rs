//! Adapters implementing the domain ports.
//!
//! The in-memory ledger and constant-product exchange stand in for the
//! external token ledger and DEX during tests and scenario runs.

pub mod in_memory;
