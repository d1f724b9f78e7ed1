//! Scripted network and test utilities.
//!
//! [`ScriptedNetwork`] plays both sides of the transaction lifecycle: it
//! accepts posted transactions and answers confirmation polls from a
//! script of statuses, counting every call so tests can assert on them.
//!
//! [`MockQuerier`] answers contract queries with canned JSON responses.
//!
//! [`swap_tx_info`] and [`tx_config`] provide fixtures matching what the
//! contracts emit on chain.
//!

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use dashmap::DashMap;
use fastnum::dec256;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    AddressProvider,
    error::{NetworkError, QueryError},
    query::ContractQuerier,
    receipt::FROM_CONTRACT_EVENT,
    tx::{Tax, TxConfig, TxInfoSource, TxOptions, TxResult, TxStatus},
    types::{Attribute, Coin, Event, TxHash, TxInfo, TxLog},
};

pub const TEST_ADDRESS: &str = "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v";
pub const TEST_VALIDATOR: &str = "terravaloper1krj7amhhagjnyg2tkkuh6l0550y733jnjnnlzy";
pub const TEST_HASH: &str = "6A1D3F2B9C8E7D5A4B3C2D1E0F9A8B7C6D5E4F3A2B1C0D9E8F7A6B5C4D3E2F1A";

const TEST_HEIGHT: u64 = 5_513_399;

/// Contract addresses used by tests.
#[derive(Clone, Debug)]
pub struct TestAddresses {
    pub anc_ust_pair: String,
    pub overseer: String,
    pub basset_hub: String,
    pub basset_token: String,
}

impl Default for TestAddresses {
    fn default() -> Self {
        Self {
            anc_ust_pair: "terra1wfz7h3aqf4cjmjcvc6s8lxdhh7k30nkczyf0mj".to_string(),
            overseer: "terra1qljxd0y3j3gk97025qvl3lgq8ygup4gsksvaxv".to_string(),
            basset_hub: "terra1fflas6wv4snv8lsda9knvq2w0cyt493r8puh2e".to_string(),
            basset_token: "terra1u0t35drzyy0mujj8rkdyzhe264uls4ug3wdp3x".to_string(),
        }
    }
}

impl AddressProvider for TestAddresses {
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

/// Fee parameters: 0.15 UST fee, 0.1 UST fixed gas, 0.1% tax capped at 1 UST.
pub fn tx_config() -> TxConfig {
    TxConfig {
        gas_fee: 1_000_000,
        gas_adjustment: dec256!(1.6),
        tx_fee: dec256!(150000),
        fixed_gas: dec256!(100000),
        tax: Tax {
            rate: dec256!(0.001),
            cap: dec256!(1000000),
        },
    }
}

/// Sleep that returns immediately, for pipelines under test.
pub async fn no_sleep(_: Duration) {}

/// Confirmed swap transaction with the given `from_contract` attributes.
pub fn swap_tx_info(hash: &str, attributes: &[(&str, &str)]) -> TxInfo {
    let mut from_contract = vec![
        Attribute::new("contract_address", TestAddresses::default().anc_ust_pair),
        Attribute::new("action", "swap"),
    ];
    from_contract.extend(attributes.iter().map(|(k, v)| Attribute::new(*k, *v)));

    tx_info(
        hash,
        vec![TxLog {
            msg_index: 0,
            log: String::new(),
            events: vec![
                Event::new(
                    "message",
                    vec![Attribute::new("action", "execute_contract")],
                ),
                Event::new(FROM_CONTRACT_EVENT, from_contract),
            ],
        }],
    )
}

/// Confirmed transaction with the given message logs.
pub fn tx_info(hash: &str, logs: Vec<TxLog>) -> TxInfo {
    TxInfo {
        txhash: TxHash::new(hash),
        height: TEST_HEIGHT,
        code: 0,
        raw_log: "[]".to_string(),
        logs: Some(logs),
    }
}

/// Submitter and poller answering from a script.
///
/// Polls consume the scripted statuses in order; once the script is
/// exhausted the confirmed transaction is returned if one was set, and
/// `Pending` otherwise.
#[derive(Debug)]
pub struct ScriptedNetwork {
    hash: TxHash,
    post_error: Option<NetworkError>,
    script: Mutex<VecDeque<Result<TxStatus, NetworkError>>>,
    confirmed: Option<TxInfo>,
    posted: Mutex<Vec<TxOptions>>,
    polls: AtomicUsize,
}

impl ScriptedNetwork {
    /// Network broadcasting transactions under `hash`.
    pub fn new(hash: &str) -> Self {
        Self {
            hash: TxHash::new(hash),
            post_error: None,
            script: Mutex::new(VecDeque::new()),
            confirmed: None,
            posted: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TxStatus>) -> Self {
        self.script
            .get_mut()
            .unwrap()
            .extend(statuses.into_iter().map(Ok));
        self
    }

    pub fn with_poll_error(mut self, error: NetworkError) -> Self {
        self.script.get_mut().unwrap().push_back(Err(error));
        self
    }

    pub fn with_confirmed(mut self, info: TxInfo) -> Self {
        self.confirmed = Some(info);
        self
    }

    /// Rejects every submission with `error`.
    pub fn with_post_error(mut self, error: NetworkError) -> Self {
        self.post_error = Some(error);
        self
    }

    /// Rejects every submission as the node would with the broadcast `log`.
    pub fn with_broadcast_log(self, log: &str) -> Self {
        self.with_post_error(NetworkError::from_broadcast_log(log))
    }

    pub async fn post(&self, options: TxOptions) -> Result<TxResult, NetworkError> {
        self.posted.lock().unwrap().push(options);
        match &self.post_error {
            Some(error) => Err(error.clone()),
            None => Ok(TxResult {
                txhash: self.hash.clone(),
            }),
        }
    }

    /// Number of submissions, rejected ones included.
    pub fn posts(&self) -> usize {
        self.posted.lock().unwrap().len()
    }

    pub fn posted(&self) -> Vec<TxOptions> {
        self.posted.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl TxInfoSource for ScriptedNetwork {
    async fn tx_info(&self, hash: &TxHash) -> Result<TxStatus, NetworkError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if *hash != self.hash {
            return Ok(TxStatus::NotFound);
        }

        match self.script.lock().unwrap().pop_front() {
            Some(status) => status,
            None => Ok(self
                .confirmed
                .clone()
                .map_or(TxStatus::Pending, TxStatus::Confirmed)),
        }
    }
}

/// Contract querier answering with canned JSON responses.
///
/// Wasm queries without a response fail with HTTP 404, addresses without
/// balances hold nothing.
#[derive(Debug, Default)]
pub struct MockQuerier {
    wasm: DashMap<(String, String), serde_json::Value>,
    balances: DashMap<String, Vec<Coin>>,
    wasm_calls: AtomicUsize,
}

impl MockQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` on `contract` with `response`.
    pub fn with_wasm(
        self,
        contract: &str,
        query: serde_json::Value,
        response: serde_json::Value,
    ) -> Self {
        self.wasm
            .insert((contract.to_string(), query.to_string()), response);
        self
    }

    pub fn with_balances(self, address: &str, coins: Vec<Coin>) -> Self {
        self.balances.insert(address.to_string(), coins);
        self
    }

    pub fn wasm_calls(&self) -> usize {
        self.wasm_calls.load(Ordering::SeqCst)
    }
}

impl ContractQuerier for MockQuerier {
    async fn wasm_query<Q, R>(&self, contract: &str, query: &Q) -> Result<R, QueryError>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.wasm_calls.fetch_add(1, Ordering::SeqCst);
        // `Value` keeps object keys sorted, making the key independent of field order
        let query = serde_json::to_value(query)?.to_string();
        let response = self
            .wasm
            .get(&(contract.to_string(), query.clone()))
            .map(|r| r.value().clone())
            .ok_or_else(|| NetworkError::Http {
                status: 404,
                message: format!("no response for {query} on {contract}"),
            })?;
        Ok(serde_json::from_value(response)?)
    }

    async fn native_balances(&self, address: &str) -> Result<Vec<Coin>, QueryError> {
        Ok(self
            .balances
            .get(address)
            .map(|b| b.value().clone())
            .unwrap_or_default())
    }
}
