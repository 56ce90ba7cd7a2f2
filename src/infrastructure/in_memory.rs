use crate::domain::asset::{Address, Balance};
use crate::domain::ports::{AssetLedger, ValueConverter};
use crate::error::{EscrowError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory fungible-token ledger.
///
/// Balances are keyed by `(asset, holder)`. Stands in for the external
/// token ledger in tests and scenario runs.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    balances: Arc<RwLock<HashMap<(Address, Address), Balance>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` of `asset` to `holder`.
    pub async fn credit(&self, asset: Address, holder: Address, amount: Balance) {
        let mut balances = self.balances.write().await;
        *balances.entry((asset, holder)).or_default() += amount;
    }

    /// Burns `amount` of `asset` from `holder`, failing if uncovered.
    pub async fn debit(&self, asset: Address, holder: Address, amount: Balance) -> Result<()> {
        let mut balances = self.balances.write().await;
        let held = balances.entry((asset, holder)).or_default();
        if *held < amount {
            return Err(EscrowError::InsufficientFunds {
                held: *held,
                requested: amount,
            });
        }
        *held -= amount;
        Ok(())
    }
}

#[async_trait]
impl AssetLedger for InMemoryLedger {
    async fn balance_of(&self, asset: Address, holder: Address) -> Result<Balance> {
        let balances = self.balances.read().await;
        Ok(balances.get(&(asset, holder)).copied().unwrap_or_default())
    }

    async fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<()> {
        let mut balances = self.balances.write().await;
        let held = balances.get(&(asset, from)).copied().unwrap_or_default();
        if held < amount {
            return Err(EscrowError::InsufficientFunds {
                held,
                requested: amount,
            });
        }
        balances.insert((asset, from), held - amount);
        *balances.entry((asset, to)).or_default() += amount;
        Ok(())
    }
}

/// A fee-less constant-product (x*y=k) exchange over the in-memory ledger.
///
/// Pools are per asset pair and usable in both directions; multi-hop paths
/// walk the pairs left to right. Quotes are pure; swaps debit and credit the
/// holder on the ledger and update the reserves.
#[derive(Clone)]
pub struct ConstantProductDex {
    ledger: InMemoryLedger,
    pools: Arc<RwLock<HashMap<(Address, Address), (Decimal, Decimal)>>>,
}

impl ConstantProductDex {
    pub fn new(ledger: InMemoryLedger) -> Self {
        Self {
            ledger,
            pools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn add_pool(
        &self,
        asset_a: Address,
        asset_b: Address,
        reserve_a: Decimal,
        reserve_b: Decimal,
    ) {
        let mut pools = self.pools.write().await;
        pools.insert((asset_a, asset_b), (reserve_a, reserve_b));
    }

    fn reserves(
        pools: &HashMap<(Address, Address), (Decimal, Decimal)>,
        asset_in: Address,
        asset_out: Address,
    ) -> Result<(Decimal, Decimal)> {
        if let Some(&(r_in, r_out)) = pools.get(&(asset_in, asset_out)) {
            Ok((r_in, r_out))
        } else if let Some(&(r_out, r_in)) = pools.get(&(asset_out, asset_in)) {
            Ok((r_in, r_out))
        } else {
            Err(EscrowError::UnsupportedPair(asset_in, asset_out))
        }
    }

    fn store_reserves(
        pools: &mut HashMap<(Address, Address), (Decimal, Decimal)>,
        asset_in: Address,
        asset_out: Address,
        r_in: Decimal,
        r_out: Decimal,
    ) {
        if pools.contains_key(&(asset_in, asset_out)) {
            pools.insert((asset_in, asset_out), (r_in, r_out));
        } else {
            pools.insert((asset_out, asset_in), (r_out, r_in));
        }
    }

    fn validate_path(path: &[Address]) -> Result<()> {
        if path.len() < 2 {
            return Err(EscrowError::ValidationError(
                "swap path needs at least two assets".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ValueConverter for ConstantProductDex {
    async fn quote(&self, path: &[Address], amount_in: Balance) -> Result<Balance> {
        Self::validate_path(path)?;
        let pools = self.pools.read().await;
        let mut amount = amount_in.0;
        for pair in path.windows(2) {
            let (r_in, r_out) = Self::reserves(&pools, pair[0], pair[1])?;
            amount = r_out * amount / (r_in + amount);
        }
        Ok(Balance::new(amount))
    }

    async fn swap_exact_in(
        &self,
        holder: Address,
        path: &[Address],
        amount_in: Balance,
        min_out: Balance,
    ) -> Result<Balance> {
        Self::validate_path(path)?;
        let mut pools = self.pools.write().await;

        // Plan every hop before touching balances or reserves.
        let mut amount = amount_in.0;
        let mut updates = Vec::with_capacity(path.len() - 1);
        for pair in path.windows(2) {
            let (r_in, r_out) = Self::reserves(&pools, pair[0], pair[1])?;
            let out = r_out * amount / (r_in + amount);
            updates.push((pair[0], pair[1], r_in + amount, r_out - out));
            amount = out;
        }
        let amount_out = Balance::new(amount);
        if amount_out < min_out {
            return Err(EscrowError::BelowMinimum {
                out: amount_out,
                min: min_out,
            });
        }

        self.ledger.debit(path[0], holder, amount_in).await?;
        self.ledger
            .credit(path[path.len() - 1], holder, amount_out)
            .await;
        for (asset_in, asset_out, r_in, r_out) in updates {
            Self::store_reserves(&mut pools, asset_in, asset_out, r_in, r_out);
        }
        Ok(amount_out)
    }

    async fn swap_exact_out(
        &self,
        holder: Address,
        path: &[Address],
        amount_out: Balance,
        max_in: Balance,
    ) -> Result<Balance> {
        Self::validate_path(path)?;
        let mut pools = self.pools.write().await;

        // Walk the path backwards to find the required input.
        let mut amount = amount_out.0;
        let mut updates = Vec::with_capacity(path.len() - 1);
        for pair in path.windows(2).rev() {
            let (r_in, r_out) = Self::reserves(&pools, pair[0], pair[1])?;
            if amount >= r_out {
                return Err(EscrowError::ValidationError(format!(
                    "pool {} -> {} lacks liquidity for requested output",
                    pair[0], pair[1]
                )));
            }
            let input = r_in * amount / (r_out - amount);
            updates.push((pair[0], pair[1], r_in + input, r_out - amount));
            amount = input;
        }
        let amount_in = Balance::new(amount);
        if amount_in > max_in {
            return Err(EscrowError::AboveMaximum { amount_in, max: max_in });
        }

        self.ledger.debit(path[0], holder, amount_in).await?;
        self.ledger
            .credit(path[path.len() - 1], holder, amount_out)
            .await;
        for (asset_in, asset_out, r_in, r_out) in updates {
            Self::store_reserves(&mut pools, asset_in, asset_out, r_in, r_out);
        }
        Ok(amount_in)
    }
}
