use escrowd::application::engine::EscrowEngine;
use escrowd::domain::asset::{Address, Amount, Balance};
use escrowd::infrastructure::in_memory::{ConstantProductDex, InMemoryLedger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn custody() -> Address {
    Address::from_low_u64(0xcc)
}

pub fn reference() -> Address {
    Address::from_low_u64(1)
}

pub fn asset_a() -> Address {
    Address::from_low_u64(10)
}

pub fn asset_b() -> Address {
    Address::from_low_u64(11)
}

pub fn initiator() -> Address {
    Address::from_low_u64(0x11)
}

pub fn beneficiary() -> Address {
    Address::from_low_u64(0x22)
}

pub fn amount(value: Decimal) -> Amount {
    Amount::new(value).unwrap()
}

pub struct Harness {
    pub engine: EscrowEngine,
    pub ledger: InMemoryLedger,
    pub dex: ConstantProductDex,
}

/// Engine wired to an in-memory ledger and two seeded pools
/// (asset A <-> reference, reference <-> asset B), with custody funded
/// with 10000 of asset A.
pub async fn setup() -> Harness {
    let ledger = InMemoryLedger::new();
    let dex = ConstantProductDex::new(ledger.clone());
    dex.add_pool(asset_a(), reference(), dec!(1000), dec!(1000))
        .await;
    dex.add_pool(reference(), asset_b(), dec!(1000), dec!(1000))
        .await;
    ledger
        .credit(asset_a(), custody(), Balance::new(dec!(10000)))
        .await;
    let engine = EscrowEngine::new(
        custody(),
        reference(),
        Box::new(ledger.clone()),
        Box::new(dex.clone()),
    );
    Harness {
        engine,
        ledger,
        dex,
    }
}
