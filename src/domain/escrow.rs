use super::asset::{Address, Balance};
use serde::Serialize;

/// One funded, time-bounded conversion agreement.
///
/// Immutable after creation except for `payout_asset` (beneficiary's choice,
/// until settlement) and `completed` (set exactly once by settlement).
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct EscrowRecord {
    /// Position in the append-only log.
    pub id: u64,
    /// Who funded the escrow and may settle it early.
    pub initiator: Address,
    /// Who receives the payout and may redirect it into another asset.
    pub beneficiary: Address,
    /// Asset deposited into custody at creation.
    pub deposit_asset: Address,
    /// Deposited quantity, consumed by the settlement swap.
    pub deposit_amount: Balance,
    /// Value of the deposit in the reference asset, quoted once at creation.
    pub reference_value: Balance,
    /// Payout redirection target; `None` pays out the reference asset.
    pub payout_asset: Option<Address>,
    /// Block height at which the automatic trigger becomes eligible.
    pub deadline: u64,
    pub completed: bool,
}

impl EscrowRecord {
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// The authority under which `settle` runs.
///
/// The block-boundary trigger acts with the engine's own authority rather
/// than impersonating an account, so both permitted settlement paths are
/// explicit inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    External(Address),
    SelfTriggered,
}

/// Emitted once per state transition: `fulfilled` is false at initiation and
/// true at settlement.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct EscrowUpdate {
    pub initiator: Address,
    pub beneficiary: Address,
    pub reference_value: Balance,
    pub fulfilled: bool,
}
