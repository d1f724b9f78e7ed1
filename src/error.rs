use std::time::Duration;

use crate::types::TxHash;

/// User input rejected before any message is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid validator address: {0:?}")]
    InvalidValidatorAddress(String),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("amount must be greater than zero: {0}")]
    NotPositive(String),

    #[error("amount is too large: {0}")]
    TooLarge(String),
}

/// Transaction options could not be assembled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("gas limit must be greater than zero")]
    ZeroGas,

    #[error("gas adjustment must be positive, got {0}")]
    InvalidGasAdjustment(String),

    #[error("transaction fee must not be negative, got {0}")]
    NegativeFee(String),

    #[error("transaction fee overflows: {0}")]
    FeeOverflow(String),

    #[error("no messages to broadcast")]
    NoMessages,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("failed to encode message: {0}")]
    Encode(String),
}

/// Failure reported by the node or the wallet while submitting or polling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("insufficient fee: {0}")]
    InsufficientFee(String),

    #[error("account sequence mismatch: {0}")]
    SequenceMismatch(String),

    #[error("unexpected http status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Receipt construction failed on a confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("attribute {key} is not a number: {value:?}")]
    InvalidNumber { key: String, value: String },

    #[error("division by zero computing {0}")]
    DivisionByZero(&'static str),

    #[error("attribute {key} is out of range: {value}")]
    OutOfRange { key: String, value: String },
}

/// Error terminating a transaction pipeline.
///
/// Every variant ends up in the `Fail` snapshot of the pipeline; nothing
/// is propagated to the caller otherwise.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to build transaction: {0}")]
    Build(#[from] BuildError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("transaction {hash} was not confirmed within {waited:?}, its outcome is unknown")]
    Timeout { hash: TxHash, waited: Duration },

    #[error("transaction {hash} failed with code {code}: {raw_log}")]
    Failed {
        hash: TxHash,
        code: u32,
        raw_log: String,
    },

    #[error("log not found, tx: {0}, index: {1}")]
    LogNotFound(TxHash, usize),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("failed to parse transaction result: {0}")]
    Parse(#[from] ParseError),

    #[error("identical transaction is already in flight")]
    AlreadyInFlight,
}

impl TxError {
    /// The transaction may or may not have been executed.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, TxError::Timeout { .. })
    }
}

/// Error returned by contract state queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("balance of {denom} for {address} is not a number: {amount:?}")]
    InvalidBalance {
        address: String,
        denom: String,
        amount: String,
    },
}

impl From<reqwest::Error> for NetworkError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
                message: value.to_string(),
            },
            None => Self::Transport(value.to_string()),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.into())
    }
}

impl NetworkError {
    /// Classifies a submission failure message reported by the node or wallet.
    pub fn from_broadcast_log(log: &str) -> Self {
        // Heuristic over the cosmos-sdk error strings
        let msg = log.to_ascii_lowercase();
        if msg.contains("insufficient fee") {
            Self::InsufficientFee(log.to_string())
        } else if msg.contains("account sequence mismatch") || msg.contains("incorrect account sequence") {
            Self::SequenceMismatch(log.to_string())
        } else if msg.contains("signature") || msg.contains("user denied") || msg.contains("rejected") {
            Self::Rejected(log.to_string())
        } else {
            Self::Transport(log.to_string())
        }
    }
}
