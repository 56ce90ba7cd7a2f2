//! Domain layer: value objects, the escrow aggregate and the collaborator
//! ports the engine depends on.

pub mod asset;
pub mod escrow;
pub mod ports;
