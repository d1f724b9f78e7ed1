use std::{future::Future, sync::Arc, time::Duration};

use fastnum::D256;
use futures::{Stream, stream};
use itertools::Itertools;
use tracing::{debug, info, warn};

use super::{
    InFlight, InFlightGuard, PollConfig, TxConfig, TxHelper, TxInfoSource, TxOptions,
    TxResultRendering, TxStatus, TxStreamPhase, TxSubmitter,
};
use crate::{
    AddressProvider,
    error::{BuildError, TxError, ValidationError},
    msg::{ContractMessage, Fabricate},
    receipt::{Receipt, ReceiptParser},
    types::{TxHash, TxInfo},
};

/// Converts pipeline errors into messages displayed to the user.
pub type ErrorReporter = Arc<dyn Fn(&TxError) -> String + Send + Sync>;

/// State of a single pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub enum TxState {
    /// Refused before broadcast: invalid input, fee parameters or duplicate.
    Rejected(TxError),
    /// Options are ready to be posted.
    Built(TxOptions),
    /// Accepted by the network.
    Broadcast(TxHash),
    /// Waiting for the transaction to be included in a block.
    Confirming(TxHash),
    Succeeded,
    Failed,
}

/// Transaction pipeline: build → post → poll → extract.
///
/// Posting is delegated to a [`TxSubmitter`] (usually the wallet),
/// confirmation status is read from a [`TxInfoSource`], and `sleep` is used
/// to wait between polls (e.g. [`tokio::time::sleep`]).
pub struct TxPipeline<P, Q, S> {
    submitter: P,
    poller: Q,
    sleep: S,
    poll: PollConfig,
    reporter: Option<ErrorReporter>,
    in_flight: Option<InFlight>,
    on_succeed: Option<Box<dyn FnOnce() + Send>>,
}

impl<P, Q, S, SFut> TxPipeline<P, Q, S>
where
    P: TxSubmitter,
    Q: TxInfoSource,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    pub fn new(submitter: P, poller: Q, sleep: S) -> Self {
        Self {
            submitter,
            poller,
            sleep,
            poll: PollConfig::default(),
            reporter: None,
            in_flight: None,
            on_succeed: None,
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Uses `reporter` instead of the error's `Display` for failure messages.
    pub fn with_error_reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&TxError) -> String + Send + Sync + 'static,
    {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Refuses to run while an identical transaction is in flight in `registry`.
    pub fn with_in_flight(mut self, registry: InFlight) -> Self {
        self.in_flight = Some(registry);
        self
    }

    /// Called once when the run succeeds.
    pub fn on_succeed<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_succeed = Some(Box::new(f));
        self
    }

    /// Fabricates messages from `intent` and runs them through the pipeline.
    ///
    /// The returned stream emits a snapshot per stage and always ends with
    /// a `Succeed` or `Fail` snapshot. Dropping the stream stops the run:
    /// no further network calls are made, the broadcast transaction itself
    /// is left as is.
    pub fn execute<I, A, R>(
        self,
        intent: &I,
        addresses: &A,
        config: &TxConfig,
        parser: R,
    ) -> impl Stream<Item = TxResultRendering> + use<P, Q, S, SFut, I, A, R>
    where
        I: Fabricate,
        A: AddressProvider + ?Sized,
        R: ReceiptParser,
    {
        self.execute_msgs(intent.fabricate(addresses), config, parser)
    }

    /// Runs already fabricated messages through the pipeline.
    pub fn execute_msgs<R>(
        self,
        msgs: Result<Vec<ContractMessage>, ValidationError>,
        config: &TxConfig,
        parser: R,
    ) -> impl Stream<Item = TxResultRendering> + use<P, Q, S, SFut, R>
    where
        R: ReceiptParser,
    {
        let prepared = self
            .check_poll_config()
            .and_then(|()| prepare(msgs, config, self.in_flight.as_ref()));
        let (state, guard) = match prepared {
            Ok((options, guard)) => (TxState::Built(options), guard),
            Err(error) => (TxState::Rejected(error), None),
        };
        TxRun::start(self, parser, state, guard, TxHelper::new()).into_stream()
    }

    /// Follows a transaction broadcast elsewhere, from confirmation on.
    ///
    /// `fee` is the fee attached to the transaction in micro UST, reported
    /// by parsers when they can't derive it from the event.
    pub fn follow<R>(
        self,
        hash: TxHash,
        fee: D256,
        parser: R,
    ) -> impl Stream<Item = TxResultRendering> + use<P, Q, S, SFut, R>
    where
        R: ReceiptParser,
    {
        let acquired = self
            .check_poll_config()
            .and_then(|()| acquire(self.in_flight.as_ref(), hash.to_string()));
        let (state, guard) = match acquired {
            Ok(guard) => (TxState::Broadcast(hash.clone()), guard),
            Err(error) => (TxState::Rejected(error), None),
        };
        TxRun::start(self, parser, state, guard, TxHelper::broadcast(hash, fee)).into_stream()
    }
}

impl<P, Q, S> TxPipeline<P, Q, S> {
    /// A zero interval never accumulates waiting time, so the timeout
    /// would never be reached.
    fn check_poll_config(&self) -> Result<(), TxError> {
        if self.poll.interval.is_zero() {
            return Err(BuildError::ZeroPollInterval.into());
        }
        Ok(())
    }
}

struct TxRun<P, Q, S, R> {
    submitter: P,
    poller: Q,
    sleep: S,
    parser: R,
    poll: PollConfig,
    reporter: Option<ErrorReporter>,
    on_succeed: Option<Box<dyn FnOnce() + Send>>,
    guard: Option<InFlightGuard>,
    helper: TxHelper,
    state: TxState,
}

impl<P, Q, S, SFut, R> TxRun<P, Q, S, R>
where
    P: TxSubmitter,
    Q: TxInfoSource,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
    R: ReceiptParser,
{
    fn start(
        pipeline: TxPipeline<P, Q, S>,
        parser: R,
        state: TxState,
        guard: Option<InFlightGuard>,
        helper: TxHelper,
    ) -> Self {
        let TxPipeline {
            submitter,
            poller,
            sleep,
            poll,
            reporter,
            in_flight: _,
            on_succeed,
        } = pipeline;

        Self {
            submitter,
            poller,
            sleep,
            parser,
            poll,
            reporter,
            on_succeed,
            guard,
            helper,
            state,
        }
    }

    fn into_stream(self) -> impl Stream<Item = TxResultRendering> {
        stream::unfold(self, |mut run| async move {
            let rendering = run.advance().await?;
            Some((rendering, run))
        })
    }

    /// Performs the next transition, `None` once a terminal state is reached.
    async fn advance(&mut self) -> Option<TxResultRendering> {
        match std::mem::replace(&mut self.state, TxState::Failed) {
            TxState::Rejected(error) => Some(self.fail(error)),
            TxState::Built(options) => Some(self.broadcast(options).await),
            TxState::Broadcast(hash) => {
                self.state = TxState::Confirming(hash);
                Some(self.render(TxStreamPhase::Confirm))
            }
            TxState::Confirming(hash) => Some(self.confirm(hash).await),
            state @ (TxState::Succeeded | TxState::Failed) => {
                self.state = state;
                None
            }
        }
    }

    async fn broadcast(&mut self, options: TxOptions) -> TxResultRendering {
        self.helper.save_options(&options);
        debug!(
            msgs = options.msgs.len(),
            gas = options.fee.gas,
            fee = %options.fee_amount(),
            "Posting transaction"
        );

        match self.submitter.post(options).await {
            Ok(result) => {
                info!(hash = %result.txhash, "Transaction broadcast");
                self.helper.set_hash(result.txhash.clone());
                self.state = TxState::Broadcast(result.txhash);
                self.render(TxStreamPhase::Broadcast)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    async fn confirm(&mut self, hash: TxHash) -> TxResultRendering {
        self.helper.record_poll();
        match self.poller.tx_info(&hash).await {
            Ok(TxStatus::Confirmed(info)) => self.extract(info),
            Ok(status) => {
                let waited = self.helper.waited();
                if waited >= self.poll.timeout {
                    return self.fail(TxError::Timeout { hash, waited });
                }
                debug!(
                    %hash,
                    ?status,
                    attempt = self.helper.poll_attempts(),
                    "Transaction not confirmed yet"
                );
                (self.sleep)(self.poll.interval).await;
                self.helper.record_wait(self.poll.interval);
                self.state = TxState::Confirming(hash);
                self.render(TxStreamPhase::Confirm)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn extract(&mut self, info: TxInfo) -> TxResultRendering {
        match self.receipts(&info) {
            Ok(receipts) => {
                info!(hash = %info.txhash, height = info.height, "Transaction succeeded");
                self.state = TxState::Succeeded;
                self.guard.take();
                if let Some(on_succeed) = self.on_succeed.take() {
                    on_succeed();
                }
                TxResultRendering::new(TxStreamPhase::Succeed, receipts)
            }
            Err(e) => self.fail(e),
        }
    }

    fn receipts(&self, info: &TxInfo) -> Result<Vec<Receipt>, TxError> {
        if info.is_failed() {
            return Err(TxError::Failed {
                hash: info.txhash.clone(),
                code: info.code,
                raw_log: info.raw_log.clone(),
            });
        }

        let index = self.parser.log_index();
        let log = info
            .raw_log(index)
            .ok_or_else(|| TxError::LogNotFound(info.txhash.clone(), index))?;

        let event_type = self.parser.event_type();
        let event = log
            .event(event_type)
            .ok_or_else(|| TxError::EventNotFound(event_type.to_string()))?;

        Ok(self.parser.receipts(event, &self.helper)?)
    }

    fn fail(&mut self, error: TxError) -> TxResultRendering {
        let message = match &self.reporter {
            Some(reporter) => reporter(&error),
            None => error.to_string(),
        };
        warn!(%error, hash = ?self.helper.hash(), "Transaction failed");

        self.state = TxState::Failed;
        self.guard.take();
        TxResultRendering::failed(self.helper.tx_hash_receipt().into_iter().collect(), error, message)
    }

    fn render(&self, phase: TxStreamPhase) -> TxResultRendering {
        TxResultRendering::new(phase, self.helper.tx_hash_receipt().into_iter().collect())
    }
}

fn prepare(
    msgs: Result<Vec<ContractMessage>, ValidationError>,
    config: &TxConfig,
    in_flight: Option<&InFlight>,
) -> Result<(TxOptions, Option<InFlightGuard>), TxError> {
    let options = TxOptions::build(msgs?, config)?;
    let guard = acquire(in_flight, in_flight_key(&options.msgs)?)?;
    Ok((options, guard))
}

fn acquire(in_flight: Option<&InFlight>, key: String) -> Result<Option<InFlightGuard>, TxError> {
    in_flight
        .map(|registry| registry.acquire(key).ok_or(TxError::AlreadyInFlight))
        .transpose()
}

fn in_flight_key(msgs: &[ContractMessage]) -> Result<String, BuildError> {
    msgs.iter()
        .map(ContractMessage::to_json)
        .process_results(|mut encoded| encoded.join("\n"))
        .map_err(|e| BuildError::Encode(e.to_string()))
}
