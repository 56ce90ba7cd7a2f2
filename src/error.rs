use crate::domain::asset::{Address, Balance};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EscrowError>;

/// Every engine precondition fails with its own variant so callers can react
/// programmatically instead of matching on message text.
#[derive(Error, Debug)]
pub enum EscrowError {
    #[error("{0} is the zero address")]
    ZeroAddress(&'static str),
    #[error("escrow period must be at least one block")]
    InvalidPeriod,
    #[error("custody balance {held} is less than deposit {requested}")]
    InsufficientCustody { held: Balance, requested: Balance },
    #[error("current escrow not yet completed")]
    EscrowBusy,
    #[error("escrow already completed")]
    AlreadyCompleted,
    #[error("no active escrow")]
    NoActiveEscrow,
    #[error("caller is not the beneficiary")]
    NotBeneficiary,
    #[error("caller is not the initiator or the block scheduler")]
    NotAuthorizedToSettle,
    #[error("holder has {held} of the asset, transfer needs {requested}")]
    InsufficientFunds { held: Balance, requested: Balance },
    #[error("no liquidity pool for {0} -> {1}")]
    UnsupportedPair(Address, Address),
    #[error("swap output {out} is below the requested minimum {min}")]
    BelowMinimum { out: Balance, min: Balance },
    #[error("swap input {amount_in} is above the allowed maximum {max}")]
    AboveMaximum { amount_in: Balance, max: Balance },
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("address must be 20 bytes, got {0}")]
    BadAddressLength(usize),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
