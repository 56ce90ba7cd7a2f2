use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const HEADER: &str = "op, caller, to, asset_a, asset_b, amount_a, amount_b, blocks";
const ASSET_A: &str = "0x000000000000000000000000000000000000000a";
const ASSET_B: &str = "0x000000000000000000000000000000000000000b";
const REFERENCE: &str = "0x0000000000000000000000000000000000000001";
const INITIATOR: &str = "0x0000000000000000000000000000000000000011";
const BENEFICIARY: &str = "0x0000000000000000000000000000000000000022";

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("escrowd"));
    cmd.arg("tests/fixtures/test.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,initiator,beneficiary,deposit_asset,deposit_amount,reference_value,payout_asset,deadline,completed",
        ))
        // 1000 deposited against equal 1000/1000 reserves books 500 of the
        // reference asset; manual settlement completes the record.
        .stdout(predicate::str::contains("1000,500,,5,true"));

    Ok(())
}

#[test]
fn test_cli_auto_settlement_via_advance() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "pool, , , {ASSET_A}, {REFERENCE}, 1000, 1000,").unwrap();
    writeln!(file, "fund, , , {ASSET_A}, , 1000, ,").unwrap();
    writeln!(
        file,
        "initiate, {INITIATOR}, {BENEFICIARY}, {ASSET_A}, , 1000, , 2"
    )
    .unwrap();
    writeln!(file, "advance, , , , , , , 3").unwrap();

    let mut cmd = Command::new(cargo_bin!("escrowd"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1000,500,,2,true"));
}

#[test]
fn test_cli_unauthorized_settle_is_reported_and_escrow_stays_open() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "pool, , , {ASSET_A}, {REFERENCE}, 1000, 1000,").unwrap();
    writeln!(file, "fund, , , {ASSET_A}, , 1000, ,").unwrap();
    writeln!(
        file,
        "initiate, {INITIATOR}, {BENEFICIARY}, {ASSET_A}, , 1000, , 5"
    )
    .unwrap();
    // The beneficiary may not force early settlement.
    writeln!(file, "settle, {BENEFICIARY}, , , , , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("escrowd"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1000,500,,5,false"))
        .stderr(predicate::str::contains("not the initiator"));
}

#[test]
fn test_cli_advance_keeps_ticking_past_failed_settlements() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "pool, , , {ASSET_A}, {REFERENCE}, 1000, 1000,").unwrap();
    writeln!(file, "fund, , , {ASSET_A}, , 1000, ,").unwrap();
    writeln!(
        file,
        "initiate, {INITIATOR}, {BENEFICIARY}, {ASSET_A}, , 1000, , 1"
    )
    .unwrap();
    // Redirect into an asset with no pool yet: every due tick fails.
    writeln!(file, "set_payout, {BENEFICIARY}, , {ASSET_B}, , , ,").unwrap();
    writeln!(file, "advance, , , , , , , 3").unwrap();
    // Liquidity shows up; the next block settles.
    writeln!(file, "pool, , , {REFERENCE}, {ASSET_B}, 1000, 1000,").unwrap();
    writeln!(file, "advance, , , , , , , 1").unwrap();

    let mut cmd = Command::new(cargo_bin!("escrowd"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        // One failure per block of the first advance row, not just the first.
        .stderr(predicate::str::contains("no liquidity pool").count(3))
        .stdout(predicate::str::contains(format!(
            "1000,500,{ASSET_B},1,true"
        )));
}

#[test]
fn test_cli_malformed_row_is_skipped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "pool, , , {ASSET_A}, {REFERENCE}, 1000, 1000,").unwrap();
    writeln!(file, "withdraw, , , , , , ,").unwrap();
    writeln!(file, "fund, , , {ASSET_A}, , 1000, ,").unwrap();
    writeln!(
        file,
        "initiate, {INITIATOR}, {BENEFICIARY}, {ASSET_A}, , 1000, , 5"
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("escrowd"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1000,500,,5,false"))
        .stderr(predicate::str::contains("Error reading command"));
}
