use std::time::Duration;

use fastnum::D256;

use super::TxOptions;
use crate::{num, receipt::Receipt, types::TxHash};

/// Per-run transaction state shared by the pipeline stages and the
/// receipt parsers.
#[derive(Clone, derive_more::Debug, Default)]
pub struct TxHelper {
    hash: Option<TxHash>,
    #[debug("{fee:?}")]
    fee: Option<D256>,
    poll_attempts: u32,
    waited: Duration,
}

impl TxHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// State right after a broadcast with the given hash and fee (micro UST).
    pub fn broadcast(hash: TxHash, fee: D256) -> Self {
        Self {
            hash: Some(hash),
            fee: Some(fee),
            ..Self::default()
        }
    }

    /// Hash of the broadcast transaction.
    pub fn hash(&self) -> Option<&TxHash> {
        self.hash.as_ref()
    }

    /// Fee attached to the transaction, in micro UST.
    pub fn saved_fee(&self) -> Option<D256> {
        self.fee
    }

    pub fn poll_attempts(&self) -> u32 {
        self.poll_attempts
    }

    /// Total time spent waiting between confirmation polls.
    pub fn waited(&self) -> Duration {
        self.waited
    }

    pub(crate) fn save_options(&mut self, options: &TxOptions) {
        self.fee = Some(options.fee_amount());
    }

    pub(crate) fn set_hash(&mut self, hash: TxHash) {
        self.hash = Some(hash);
    }

    pub(crate) fn record_poll(&mut self) {
        self.poll_attempts += 1;
    }

    pub(crate) fn record_wait(&mut self, interval: Duration) {
        self.waited += interval;
    }

    pub fn tx_hash_receipt(&self) -> Option<Receipt> {
        self.hash
            .as_ref()
            .map(|hash| Receipt::new("Tx Hash", hash.to_string()))
    }

    /// Fee receipt for the given micro UST amount, or the saved fee if none.
    pub fn tx_fee_receipt(&self, fee: Option<D256>) -> Option<Receipt> {
        fee.or(self.fee).map(|fee| {
            Receipt::new(
                "Tx Fee",
                format!(
                    "{} UST",
                    num::format_with_postfix_units(num::Converter::micro().demicrofy(fee))
                ),
            )
        })
    }
}
