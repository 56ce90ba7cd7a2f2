use clap::Parser;
use escrowd::application::engine::EscrowEngine;
use escrowd::domain::asset::{Address, Amount, Balance};
use escrowd::domain::escrow::Caller;
use escrowd::error::{EscrowError, Result as EngineResult};
use escrowd::infrastructure::in_memory::{ConstantProductDex, InMemoryLedger};
use escrowd::interfaces::csv::command_reader::{Command, CommandReader, Op};
use escrowd::interfaces::csv::escrow_writer::EscrowWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input scenario CSV file
    input: PathBuf,

    /// Asset deposits are valued in at initiation
    #[arg(long, default_value = "0x0000000000000000000000000000000000000001")]
    reference_asset: Address,

    /// Identity the engine holds custody under
    #[arg(long, default_value = "0x00000000000000000000000000000000000000cc")]
    custody: Address,
}

fn require<T>(value: Option<T>, column: &str) -> EngineResult<T> {
    value.ok_or_else(|| EscrowError::ValidationError(format!("missing column '{column}'")))
}

async fn apply(
    cmd: Command,
    engine: &mut EscrowEngine,
    ledger: &InMemoryLedger,
    dex: &ConstantProductDex,
    custody: Address,
) -> EngineResult<()> {
    match cmd.op {
        Op::Pool => {
            dex.add_pool(
                require(cmd.asset_a, "asset_a")?,
                require(cmd.asset_b, "asset_b")?,
                require(cmd.amount_a, "amount_a")?,
                require(cmd.amount_b, "amount_b")?,
            )
            .await;
        }
        Op::Fund => {
            ledger
                .credit(
                    require(cmd.asset_a, "asset_a")?,
                    cmd.to.unwrap_or(custody),
                    Balance::new(require(cmd.amount_a, "amount_a")?),
                )
                .await;
        }
        Op::Initiate => {
            engine
                .initiate(
                    require(cmd.caller, "caller")?,
                    require(cmd.to, "to")?,
                    require(cmd.asset_a, "asset_a")?,
                    Amount::new(require(cmd.amount_a, "amount_a")?)?,
                    require(cmd.blocks, "blocks")?,
                )
                .await?;
        }
        Op::SetPayout => {
            engine.set_payout_asset(
                require(cmd.caller, "caller")?,
                require(cmd.asset_a, "asset_a")?,
            )?;
        }
        Op::Settle => {
            engine
                .settle(Caller::External(require(cmd.caller, "caller")?))
                .await?;
        }
        Op::Advance => {
            // One tick per block, as the host chain would deliver them. A
            // failed settlement attempt leaves the escrow pending; the chain
            // keeps producing blocks regardless, so report it and move on.
            for _ in 0..require(cmd.blocks, "blocks")? {
                let next = engine.height().checked_add(1).ok_or_else(|| {
                    EscrowError::ValidationError("block height overflow".to_string())
                })?;
                if let Err(e) = engine.on_tick(next).await {
                    eprintln!("Error processing block {}: {}", next, e);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let ledger = InMemoryLedger::new();
    let dex = ConstantProductDex::new(ledger.clone());
    let mut engine = EscrowEngine::new(
        cli.custody,
        cli.reference_asset,
        Box::new(ledger.clone()),
        Box::new(dex.clone()),
    );

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(cmd) => {
                if let Err(e) = apply(cmd, &mut engine, &ledger, &dex, cli.custody).await {
                    eprintln!("Error applying command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = EscrowWriter::new(stdout.lock());
    writer.write_escrows(engine.escrows()).into_diagnostic()?;

    Ok(())
}
