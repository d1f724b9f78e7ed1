use std::future::Future;

use super::TxOptions;
use crate::{
    error::NetworkError,
    types::{TxHash, TxInfo},
};

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResult {
    pub txhash: TxHash,
}

/// On-chain status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxStatus {
    /// Known to the node, not included in a block yet.
    Pending,
    NotFound,
    Confirmed(TxInfo),
}

/// Source of transaction status, queried by the confirmation poller.
pub trait TxInfoSource {
    fn tx_info(&self, hash: &TxHash) -> impl Future<Output = Result<TxStatus, NetworkError>>;
}

impl<T: TxInfoSource + ?Sized> TxInfoSource for &T {
    fn tx_info(&self, hash: &TxHash) -> impl Future<Output = Result<TxStatus, NetworkError>> {
        (**self).tx_info(hash)
    }
}

/// Signs and broadcasts transaction options, usually backed by a wallet.
///
/// Implemented for any `Fn(TxOptions) -> impl Future<Output = Result<TxResult, NetworkError>>`.
pub trait TxSubmitter {
    fn post(&self, options: TxOptions) -> impl Future<Output = Result<TxResult, NetworkError>>;
}

impl<F, Fut> TxSubmitter for F
where
    F: Fn(TxOptions) -> Fut,
    Fut: Future<Output = Result<TxResult, NetworkError>>,
{
    fn post(&self, options: TxOptions) -> impl Future<Output = Result<TxResult, NetworkError>> {
        self(options)
    }
}

/// Submitter of pipelines that only follow transactions broadcast elsewhere.
///
/// Refuses every submission, see [`TxPipeline::follow`](super::TxPipeline::follow).
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadOnly;

impl TxSubmitter for ReadOnly {
    async fn post(&self, _options: TxOptions) -> Result<TxResult, NetworkError> {
        Err(NetworkError::Rejected(
            "read-only pipeline cannot broadcast transactions".to_string(),
        ))
    }
}
