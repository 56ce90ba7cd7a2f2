//! Inbound/outbound interfaces: CSV scenario commands in, escrow log out.

pub mod csv;
