//! Client of the node LCD (legacy REST) API.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, trace};
use url::Url;

use crate::{
    error::{NetworkError, QueryError},
    query::ContractQuerier,
    tx::{TxInfoSource, TxStatus},
    types::{Coin, TxHash, TxInfo},
};

/// Mainnet public LCD endpoint.
pub const MAINNET_LCD_URL: &str = "https://lcd.terra.dev";

/// Testnet public LCD endpoint.
pub const TESTNET_LCD_URL: &str = "https://bombay-lcd.terra.dev";

/// Queries contract state and transaction status over HTTP.
#[derive(Clone, Debug)]
pub struct LcdClient {
    base: Url,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct LcdResponse<T> {
    result: T,
}

impl LcdClient {
    pub fn new(base: Url) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(mut base: Url, http: reqwest::Client) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base, http }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        self.base
            .join(path)
            .map_err(|e| NetworkError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R, QueryError> {
        trace!(%url, "LCD request");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let response: LcdResponse<R> = serde_json::from_slice(&body)?;
        Ok(response.result)
    }
}

impl ContractQuerier for LcdClient {
    async fn wasm_query<Q, R>(&self, contract: &str, query: &Q) -> Result<R, QueryError>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned,
    {
        let query_msg = serde_json::to_string(query)?;
        let mut url = self.endpoint(&format!("wasm/contracts/{contract}/store"))?;
        url.query_pairs_mut().append_pair("query_msg", &query_msg);

        debug!(contract, query = %query_msg, "Wasm query");
        self.get(url).await
    }

    async fn native_balances(&self, address: &str) -> Result<Vec<Coin>, QueryError> {
        let url = self.endpoint(&format!("bank/balances/{address}"))?;
        self.get(url).await
    }
}

impl TxInfoSource for LcdClient {
    async fn tx_info(&self, hash: &TxHash) -> Result<TxStatus, NetworkError> {
        let url = self.endpoint(&format!("txs/{hash}"))?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(TxStatus::NotFound);
        }

        let info = response.error_for_status()?.json::<TxInfo>().await?;
        Ok(TxStatus::Confirmed(info))
    }
}
