//! Follows an already broadcast transaction until it is confirmed and
//! prints its receipts.

mod error;

use std::{pin::pin, process::exit};

use clap::{Parser, ValueEnum};
use futures::{Stream, StreamExt};
use money_market_sdk::{
    config::EnvConfig,
    error::{NetworkError, TxError},
    lcd::LcdClient,
    num,
    receipt::{BondReceipts, SwapReceipts},
    tx::{ReadOnly, TxResultRendering, TxPipeline, TxStreamPhase},
    types::TxHash,
};
use tracing::{error, info};

use error::{Error, Result};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    /// UST → ANC swap
    Swap,
    /// LUNA → bLUNA bond
    Bond,
}

#[derive(Debug, Parser)]
#[command(name = "tx-receipts")]
#[command(about = "Waits for a transaction to be confirmed and prints its receipts")]
struct Cli {
    /// Hash of the broadcast transaction
    hash: String,

    /// Kind of the transaction
    #[arg(long, value_enum, default_value = "swap")]
    kind: Kind,

    /// Fee attached to the transaction in micro UST, defaults to TX_FEE
    #[arg(long)]
    fee: Option<String>,
}

fn report(error: &TxError) -> String {
    match error {
        TxError::Timeout { hash, .. } => format!(
            "Transaction {hash} is still not confirmed. It may or may not have been executed, check it in the explorer."
        ),
        TxError::Network(NetworkError::Http { status: 429, .. }) => {
            "Too many requests to the LCD, try again later".to_string()
        }
        _ => error.to_string(),
    }
}

async fn print_receipts(stream: impl Stream<Item = TxResultRendering>) -> Result<()> {
    let mut stream = pin!(stream);
    while let Some(rendering) = stream.next().await {
        match rendering.phase {
            TxStreamPhase::Broadcast | TxStreamPhase::Confirm => {
                info!(phase = ?rendering.phase, "Waiting for confirmation");
            }
            TxStreamPhase::Succeed => {
                for receipt in &rendering.receipts {
                    println!("{:>14}: {}", receipt.name, receipt.value);
                }
                return Ok(());
            }
            TxStreamPhase::Fail => {
                return Err(match rendering.failure {
                    Some(failure) => Error::Tx {
                        error: failure.error,
                        message: failure.message,
                    },
                    None => Error::StreamClosed,
                });
            }
        }
    }
    Err(Error::StreamClosed)
}

async fn run(cli: Cli, env_config: EnvConfig) -> Result<()> {
    let tx_config = env_config.to_tx_config()?;
    let poll_config = env_config.to_poll_config()?;
    let client = LcdClient::new(env_config.to_lcd_url()?);

    let fee = match &cli.fee {
        Some(fee) => num::parse(fee).ok_or_else(|| Error::InvalidFee(fee.clone()))?,
        None => tx_config.tx_fee,
    };

    let hash = TxHash::new(cli.hash.to_uppercase());
    info!(%hash, kind = ?cli.kind, "Following transaction");

    let pipeline = TxPipeline::new(ReadOnly, &client, tokio::time::sleep)
        .with_poll_config(poll_config)
        .with_error_reporter(report);

    match cli.kind {
        Kind::Swap => print_receipts(pipeline.follow(hash, fee, SwapReceipts::new(&tx_config))).await,
        Kind::Bond => print_receipts(pipeline.follow(hash, fee, BondReceipts)).await,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse environment configuration: {}", e);
            exit(1);
        }
    };

    let cli = Cli::parse();

    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(cli, env_config).await {
        error!(%e, "Failed to get transaction receipts");
        exit(1);
    }
}
