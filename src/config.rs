//! Environment configuration.
//!
//! Values come from environment variables, usually loaded from a `.env`
//! file with `dotenvy` first. Every field has a default, so an empty
//! environment is a valid testnet configuration except for the contract
//! addresses, which are only known for mainnet.
//!
//! | Variable | Default |
//! |---|---|
//! | `NETWORK` | `testnet` (`mainnet`, `testnet` or a custom name) |
//! | `CHAIN_ID` | network's chain id, required for custom networks |
//! | `LCD_URL` | public LCD of the network, required for custom networks |
//! | `ANC_UST_PAIR`, `OVERSEER`, `BASSET_HUB`, `BASSET_TOKEN` | mainnet addresses on mainnet |
//! | `GAS_FEE` | `1000000` |
//! | `GAS_ADJUSTMENT` | `1.6` |
//! | `TX_FEE`, `FIXED_GAS` | `250000` (micro UST) |
//! | `TAX_RATE`, `MAX_TAX_UUSD` | `0.001`, `1000000` |
//! | `POLL_INTERVAL_MS`, `POLL_TIMEOUT_SECS` | `1000`, `60` |
//! | `BLOCKS_PER_YEAR` | `4656810` |
//! | `SAFE_RATIO` | `0.7` |

use std::time::Duration;

use fastnum::D256;
use url::Url;

use crate::{
    BLOCKS_PER_YEAR, ContractAddresses, NetworkInfo,
    lcd::{MAINNET_LCD_URL, TESTNET_LCD_URL},
    market::SAFE_RATIO,
    num,
    tx::{PollConfig, Tax, TxConfig},
};

#[derive(Clone, Debug, serde::Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_network")]
    pub network: String,

    pub chain_id: Option<String>,

    pub lcd_url: Option<String>,

    pub anc_ust_pair: Option<String>,
    pub overseer: Option<String>,
    pub basset_hub: Option<String>,
    pub basset_token: Option<String>,

    /// Gas limit of transactions
    #[serde(default = "default_gas_fee")]
    pub gas_fee: u64,

    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: String,

    /// Fee attached to transactions, micro UST
    #[serde(default = "default_fee")]
    pub tx_fee: String,

    /// Gas part of the fee shown in receipts, micro UST
    #[serde(default = "default_fee")]
    pub fixed_gas: String,

    #[serde(default = "default_tax_rate")]
    pub tax_rate: String,

    #[serde(default = "default_max_tax")]
    pub max_tax_uusd: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    pub blocks_per_year: Option<u64>,

    pub safe_ratio: Option<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid decimal value for {field}: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid LCD URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("blocks_per_year cannot be zero")]
    ZeroBlocksPerYear,

    #[error("poll_interval_ms cannot be zero")]
    ZeroPollInterval,
}

fn default_network() -> String {
    "testnet".to_string()
}

fn default_gas_fee() -> u64 {
    1_000_000
}

fn default_gas_adjustment() -> String {
    "1.6".to_string()
}

fn default_fee() -> String {
    "250000".to_string()
}

fn default_tax_rate() -> String {
    "0.001".to_string()
}

fn default_max_tax() -> String {
    "1000000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn decimal(field: &'static str, value: &str) -> Result<D256, ConfigError> {
    num::parse(value).ok_or_else(|| ConfigError::InvalidDecimal {
        field,
        value: value.to_string(),
    })
}

fn address(
    value: &Option<String>,
    default: Option<&String>,
    field: &'static str,
) -> Result<String, ConfigError> {
    value
        .clone()
        .or_else(|| default.cloned())
        .ok_or(ConfigError::Missing(field))
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn to_network_info(&self) -> Result<NetworkInfo, ConfigError> {
        let blocks_per_year = self.blocks_per_year.unwrap_or(BLOCKS_PER_YEAR);
        if blocks_per_year == 0 {
            return Err(ConfigError::ZeroBlocksPerYear);
        }

        let (default_chain_id, required) = match self.network.as_str() {
            "mainnet" => (NetworkInfo::mainnet().chain_id().to_string(), false),
            "testnet" => (NetworkInfo::testnet().chain_id().to_string(), false),
            _ => (String::new(), true),
        };
        let chain_id = match &self.chain_id {
            Some(chain_id) => chain_id.clone(),
            None if required => return Err(ConfigError::Missing("chain_id")),
            None => default_chain_id,
        };

        Ok(NetworkInfo::custom(&self.network, chain_id, blocks_per_year))
    }

    pub fn to_lcd_url(&self) -> Result<Url, ConfigError> {
        let url = match (&self.lcd_url, self.network.as_str()) {
            (Some(url), _) => url.as_str(),
            (None, "mainnet") => MAINNET_LCD_URL,
            (None, "testnet") => TESTNET_LCD_URL,
            (None, _) => return Err(ConfigError::Missing("lcd_url")),
        };
        Ok(Url::parse(url)?)
    }

    /// Contract addresses, mainnet ones unless overridden.
    pub fn to_addresses(&self) -> Result<ContractAddresses, ConfigError> {
        let defaults = (self.network == "mainnet").then(ContractAddresses::mainnet);
        let defaults = defaults.as_ref();

        Ok(ContractAddresses {
            anc_ust_pair: address(
                &self.anc_ust_pair,
                defaults.map(|d| &d.anc_ust_pair),
                "anc_ust_pair",
            )?,
            overseer: address(&self.overseer, defaults.map(|d| &d.overseer), "overseer")?,
            basset_hub: address(&self.basset_hub, defaults.map(|d| &d.basset_hub), "basset_hub")?,
            basset_token: address(
                &self.basset_token,
                defaults.map(|d| &d.basset_token),
                "basset_token",
            )?,
        })
    }

    pub fn to_tx_config(&self) -> Result<TxConfig, ConfigError> {
        Ok(TxConfig {
            gas_fee: self.gas_fee,
            gas_adjustment: decimal("gas_adjustment", &self.gas_adjustment)?,
            tx_fee: decimal("tx_fee", &self.tx_fee)?,
            fixed_gas: decimal("fixed_gas", &self.fixed_gas)?,
            tax: Tax {
                rate: decimal("tax_rate", &self.tax_rate)?,
                cap: decimal("max_tax_uusd", &self.max_tax_uusd)?,
            },
        })
    }

    pub fn to_poll_config(&self) -> Result<PollConfig, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.poll_timeout_secs),
        })
    }

    pub fn safe_ratio(&self) -> Result<D256, ConfigError> {
        match &self.safe_ratio {
            Some(value) => decimal("safe_ratio", value),
            None => Ok(SAFE_RATIO),
        }
    }
}
