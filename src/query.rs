//! Read-only contract state queries.

use std::future::Future;

use fastnum::D256;
use serde::{Serialize, de::DeserializeOwned};

use crate::{error::QueryError, num, types::Coin};

/// Contract-query interface of the chain.
pub trait ContractQuerier {
    /// Smart query of `contract` with the JSON encoding of `query`.
    fn wasm_query<Q, R>(
        &self,
        contract: &str,
        query: &Q,
    ) -> impl Future<Output = Result<R, QueryError>>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned;

    /// Native coin balances held by `address`.
    fn native_balances(&self, address: &str) -> impl Future<Output = Result<Vec<Coin>, QueryError>>;
}

impl<T: ContractQuerier + ?Sized> ContractQuerier for &T {
    fn wasm_query<Q, R>(
        &self,
        contract: &str,
        query: &Q,
    ) -> impl Future<Output = Result<R, QueryError>>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned,
    {
        (**self).wasm_query(contract, query)
    }

    fn native_balances(&self, address: &str) -> impl Future<Output = Result<Vec<Coin>, QueryError>> {
        (**self).native_balances(address)
    }
}

/// Balance of `denom` held by `address`, zero if it holds none.
pub async fn native_balance<C>(querier: &C, address: &str, denom: &str) -> Result<D256, QueryError>
where
    C: ContractQuerier + ?Sized,
{
    let coins = querier.native_balances(address).await?;
    match coins.into_iter().find(|c| c.denom == denom) {
        // zero balances are omitted by the node
        None => Ok(D256::ZERO),
        Some(coin) => num::parse(&coin.amount)
            .filter(|amount| num::fits_u128(*amount))
            .ok_or_else(|| QueryError::InvalidBalance {
                address: address.to_string(),
                denom: denom.to_string(),
                amount: coin.amount,
            }),
    }
}
