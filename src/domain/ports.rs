use super::asset::{Address, Balance};
use crate::error::Result;
use async_trait::async_trait;

/// The external fungible-token ledger the engine holds custody on.
#[async_trait]
pub trait AssetLedger: Send + Sync {
    async fn balance_of(&self, asset: Address, holder: Address) -> Result<Balance>;
    async fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<()>;
}

/// The external exchange: pure quoting plus fund-moving swaps.
///
/// `quote` never touches balances; the swap calls debit/credit `holder`
/// on the underlying ledger.
#[async_trait]
pub trait ValueConverter: Send + Sync {
    async fn quote(&self, path: &[Address], amount_in: Balance) -> Result<Balance>;
    async fn swap_exact_in(
        &self,
        holder: Address,
        path: &[Address],
        amount_in: Balance,
        min_out: Balance,
    ) -> Result<Balance>;
    async fn swap_exact_out(
        &self,
        holder: Address,
        path: &[Address],
        amount_out: Balance,
        max_in: Balance,
    ) -> Result<Balance>;
}

pub type AssetLedgerBox = Box<dyn AssetLedger>;
pub type ValueConverterBox = Box<dyn ValueConverter>;
