use crate::domain::asset::Address;
use crate::error::EscrowError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Seed a liquidity pair on the exchange.
    Pool,
    /// Credit an asset balance (custody when `to` is empty).
    Fund,
    Initiate,
    SetPayout,
    Settle,
    /// Advance the block clock by `blocks`, ticking the engine once per block.
    Advance,
}

/// One scenario step. Which columns are meaningful depends on `op`; the
/// driver reports rows with missing columns and moves on.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub op: Op,
    pub caller: Option<Address>,
    pub to: Option<Address>,
    pub asset_a: Option<Address>,
    pub asset_b: Option<Address>,
    pub amount_a: Option<Decimal>,
    pub amount_b: Option<Decimal>,
    pub blocks: Option<u64>,
}

pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command, EscrowError>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(EscrowError::from))
    }
}
