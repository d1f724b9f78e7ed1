//! Money market SDK.
//!
//! # Overview
//!
//! Client-side transaction fabrication and yield projection for the
//! money market contracts.
//!
//! Use the fabricators in [`msg`] to turn user intents into contract
//! messages, then run them through [`tx::TxPipeline`] to broadcast,
//! follow the confirmation and render receipts via [`receipt`] parsers.
//! The pipeline is a stream of [`tx::TxResultRendering`] snapshots that
//! always ends with a `Succeed` or `Fail` phase.
//!
//! [`earn::fetch_apy_projection`] projects the next-epoch deposit rate
//! from the overseer state, see [`earn`] for the algorithm.
//!
//! [`market`] derives collateral LTV limits from the overseer whitelist.
//!
//! [`lcd::LcdClient`] implements both the [`query::ContractQuerier`] and the
//! [`tx::TxInfoSource`] interfaces over the node LCD REST API. Signing and
//! broadcasting is left to the wallet integration, see [`tx::TxSubmitter`].
//!
//! # Testing
//!
//! [`testing`] module provides scripted submitter, poller and querier
//! implementations along with transaction fixtures.

pub mod config;
pub mod earn;
pub mod error;
pub mod lcd;
pub mod market;
pub mod msg;
pub mod num;
pub mod query;
pub mod receipt;
pub mod testing;
pub mod tx;
pub mod types;

/// Average number of blocks produced in a year.
pub const BLOCKS_PER_YEAR: u64 = 4_656_810;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Network the application is operating on.
pub struct NetworkInfo {
    name: String,
    chain_id: String,
    blocks_per_year: u64,
}

impl NetworkInfo {
    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            chain_id: "columbus-5".to_string(),
            blocks_per_year: BLOCKS_PER_YEAR,
        }
    }

    pub fn testnet() -> Self {
        Self {
            name: "testnet".to_string(),
            chain_id: "bombay-12".to_string(),
            blocks_per_year: BLOCKS_PER_YEAR,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        chain_id: impl Into<String>,
        blocks_per_year: u64,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id: chain_id.into(),
            blocks_per_year,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn blocks_per_year(&self) -> u64 {
        self.blocks_per_year
    }

    pub fn is_mainnet(&self) -> bool {
        self.name == "mainnet"
    }
}

/// Resolves protocol contract addresses.
pub trait AddressProvider {
    /// Terraswap ANC/UST pair.
    fn anc_ust_pair(&self) -> &str;

    /// Money market overseer.
    fn overseer(&self) -> &str;

    /// bLuna hub.
    fn basset_hub(&self) -> &str;

    /// bLuna CW20 token.
    fn basset_token(&self) -> &str;
}

/// Static set of contract addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractAddresses {
    pub anc_ust_pair: String,
    pub overseer: String,
    pub basset_hub: String,
    pub basset_token: String,
}

impl ContractAddresses {
    pub fn mainnet() -> Self {
        Self {
            anc_ust_pair: "terra1gm5p3ner9x9xpwugn9sp6gvhd0lwrtkyrecdn3".to_string(),
            overseer: "terra1tmnqgvg567ypvsvk6rwsga3srp7e3lg6u0elp8".to_string(),
            basset_hub: "terra1mtwph2juhj0rvjz7dy92gvl6xvukaxu8rfv8ts".to_string(),
            basset_token: "terra1kc87mu460fwkqte29rquh4hc20m54fxwtsx7gp".to_string(),
        }
    }
}

impl AddressProvider for ContractAddresses {
    fn anc_ust_pair(&self) -> &str {
        &self.anc_ust_pair
    }

    fn overseer(&self) -> &str {
        &self.overseer
    }

    fn basset_hub(&self) -> &str {
        &self.basset_hub
    }

    fn basset_token(&self) -> &str {
        &self.basset_token
    }
}
