//! Error types for the receipts tool.

use money_market_sdk::{config::ConfigError, error::TxError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid fee amount: {0}")]
    InvalidFee(String),

    #[error("{message}")]
    Tx {
        #[source]
        error: TxError,
        message: String,
    },

    #[error("Receipt stream ended without a result")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
