//! Contract messages and their fabricators.
//!
//! A fabricator turns a user intent into one or more [`ContractMessage`]s,
//! validating the intent before anything else; see [`Fabricate`].
//!
//! Execute messages are modelled as [`ExecuteMsg`] variants and encoded
//! into the CosmWasm JSON shape by `serde`, e.g.
//! `{"swap":{"offer_asset":{...},"max_spread":"0.1"}}`. Optional fields
//! that are not set are omitted from the encoding.

mod fabricate;

use serde::Serialize;

use crate::types::Coin;

pub use fabricate::*;

/// Amino type of the execute contract message.
pub const EXECUTE_CONTRACT_TYPE: &str = "wasm/MsgExecuteContract";

/// Execute message sent to a contract, one variant per supported operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Terraswap pair swap.
    Swap {
        offer_asset: Asset,
        #[serde(skip_serializing_if = "Option::is_none")]
        belief_price: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_spread: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },

    /// bAsset hub bond, mints the bAsset for the attached native coins.
    Bond { validator: String },

    /// bAsset hub validator whitelisting.
    RegisterValidator { validator: String },
}

/// Overseer contract queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverseerQuery {
    Config {},
    DynrateState {},
    /// Whitelisted collateral, optionally restricted to a single token.
    Whitelist {
        #[serde(skip_serializing_if = "Option::is_none")]
        collateral_token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    NativeToken { denom: String },
    Token { contract_addr: String },
}

/// Execute contract message, ready to be signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractMessage {
    pub sender: String,
    pub contract: String,
    pub execute_msg: ExecuteMsg,
    pub coins: Vec<Coin>,
}

#[derive(Serialize)]
struct Amino<'a> {
    #[serde(rename = "type")]
    r#type: &'static str,
    value: &'a ContractMessage,
}

impl ContractMessage {
    pub fn new(
        sender: impl Into<String>,
        contract: impl Into<String>,
        execute_msg: ExecuteMsg,
        coins: Vec<Coin>,
    ) -> Self {
        Self {
            sender: sender.into(),
            contract: contract.into(),
            execute_msg,
            coins,
        }
    }

    /// JSON encoding of the execute message alone.
    pub fn execute_msg_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.execute_msg)
    }

    /// JSON encoding of the whole message.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Amino JSON encoding (`{"type": ..., "value": ...}`) expected by wallets.
    pub fn to_amino_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(Amino {
            r#type: EXECUTE_CONTRACT_TYPE,
            value: self,
        })
    }
}

impl Asset {
    pub fn native(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            info: AssetInfo::NativeToken {
                denom: denom.into(),
            },
            amount: amount.into(),
        }
    }
}
