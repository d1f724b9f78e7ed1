//! Transaction pipeline.
//!
//! [`TxPipeline`] drives a transaction through
//! build → post → poll → extract and reports its progress as a stream of
//! [`TxResultRendering`] snapshots, see [`TxPipeline::execute`].

mod helper;
mod inflight;
mod network;
mod options;
mod pipeline;

use crate::{error::TxError, receipt::Receipt};

pub use helper::TxHelper;
pub use inflight::{InFlight, InFlightGuard};
pub use network::{ReadOnly, TxInfoSource, TxResult, TxStatus, TxSubmitter};
pub use options::{Fee, PollConfig, Tax, TxConfig, TxOptions};
pub use pipeline::{ErrorReporter, TxPipeline, TxState};

/// Progress of a transaction, as displayed to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxStreamPhase {
    Broadcast,
    Confirm,
    Succeed,
    Fail,
}

/// Failure carried by the terminal `Fail` snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxFailure {
    pub error: TxError,
    /// Human-readable description produced by the error reporter.
    pub message: String,
}

/// Snapshot emitted by the pipeline at each stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResultRendering {
    pub phase: TxStreamPhase,
    pub receipts: Vec<Receipt>,
    pub failure: Option<TxFailure>,
}

impl TxResultRendering {
    pub(crate) fn new(phase: TxStreamPhase, receipts: Vec<Receipt>) -> Self {
        Self {
            phase,
            receipts,
            failure: None,
        }
    }

    pub(crate) fn failed(receipts: Vec<Receipt>, error: TxError, message: String) -> Self {
        Self {
            phase: TxStreamPhase::Fail,
            receipts,
            failure: Some(TxFailure { error, message }),
        }
    }

    /// `Succeed` and `Fail` snapshots end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, TxStreamPhase::Succeed | TxStreamPhase::Fail)
    }

    /// Receipt value by its name.
    pub fn receipt(&self, name: &str) -> Option<&str> {
        self.receipts
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value.as_str())
    }
}
