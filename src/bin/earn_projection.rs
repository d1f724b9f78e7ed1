//! Prints the projected deposit APY of the money market.
//!
//! Connection details come from the environment (see
//! `money_market_sdk::config`), the overseer can be overridden on the
//! command line.

use std::process::exit;

use clap::Parser;
use fastnum::D256;
use money_market_sdk::{config::EnvConfig, earn, lcd::LcdClient, num};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "earn-projection")]
#[command(about = "Projects the next-epoch deposit APY of the money market")]
struct Cli {
    /// Overseer contract address, defaults to the configured one
    #[arg(long)]
    overseer: Option<String>,
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

    let network = match env_config.to_network_info() {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Invalid network configuration: {}", e);
            exit(1);
        }
    };

    let lcd_url = match env_config.to_lcd_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid LCD URL: {}", e);
            exit(1);
        }
    };

    let overseer = match cli.overseer {
        Some(overseer) => overseer,
        None => match env_config.to_addresses() {
            Ok(addresses) => addresses.overseer,
            Err(e) => {
                eprintln!("Invalid contract addresses: {}", e);
                exit(1);
            }
        },
    };

    let client = LcdClient::new(lcd_url);
    match earn::fetch_apy_projection(&client, &network, &overseer).await {
        Ok(Some(projection)) => println!(
            "Projected APY: {}% from height {}",
            num::format_fixed(projection.rate * D256::from(100u64), 2),
            projection.height
        ),
        Ok(None) => println!("APY projection is not available on {}", network.name()),
        Err(e) => {
            error!(%e, %overseer, "Failed to fetch APY projection");
            exit(1);
        }
    }
}
