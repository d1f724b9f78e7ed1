//! Borrow market helpers.

use fastnum::{D256, dec256};
use serde::Deserialize;

use crate::{
    error::QueryError,
    msg::OverseerQuery,
    num::deserialize_decimal,
    query::ContractQuerier,
};

/// Portion of the max LTV users are advised to borrow up to.
pub const SAFE_RATIO: D256 = dec256!(0.7);

/// Collateral entry of the overseer whitelist.
#[derive(Clone, derive_more::Debug, PartialEq, Deserialize)]
pub struct WhitelistElem {
    pub name: String,
    pub symbol: String,
    pub collateral_token: String,
    pub custody_contract: String,
    #[debug("{max_ltv}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub max_ltv: D256,
}

/// Response of the overseer `whitelist {}` query.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WhitelistResponse {
    pub elems: Vec<WhitelistElem>,
}

/// Loan-to-value limits of a collateral.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct CollateralLtv {
    #[debug("{max_ltv}")]
    pub max_ltv: D256,
    /// `max_ltv × safe_ratio`.
    #[debug("{safe_ltv}")]
    pub safe_ltv: D256,
}

impl CollateralLtv {
    /// Limits of `collateral_token`, `None` if it isn't whitelisted.
    pub fn for_collateral(
        whitelist: &WhitelistResponse,
        collateral_token: &str,
        safe_ratio: D256,
    ) -> Option<Self> {
        whitelist
            .elems
            .iter()
            .find(|e| e.collateral_token == collateral_token)
            .map(|e| Self {
                max_ltv: e.max_ltv,
                safe_ltv: e.max_ltv * safe_ratio,
            })
    }
}

pub async fn fetch_whitelist<C>(querier: &C, overseer: &str) -> Result<WhitelistResponse, QueryError>
where
    C: ContractQuerier + ?Sized,
{
    querier
        .wasm_query(
            overseer,
            &OverseerQuery::Whitelist {
                collateral_token: None,
                start_after: None,
                limit: None,
            },
        )
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::MockQuerier;

    const OVERSEER: &str = "terra1qljxd0y3j3gk97025qvl3lgq8ygup4gsksvaxv";
    const BLUNA: &str = "terra1u0t35drzyy0mujj8rkdyzhe264uls4ug3wdp3x";

    fn whitelist() -> serde_json::Value {
        json!({
            "elems": [{
                "name": "Bonded Luna",
                "symbol": "BLUNA",
                "max_ltv": "0.5",
                "custody_contract": "terra1ltnkx0mv7lf2rca9f8w740ashu93ujughy4s7p",
                "collateral_token": BLUNA,
            }]
        })
    }

    #[test]
    fn test_collateral_ltv() {
        let whitelist: WhitelistResponse = serde_json::from_value(whitelist()).unwrap();

        let ltv = CollateralLtv::for_collateral(&whitelist, BLUNA, SAFE_RATIO).unwrap();
        assert_eq!(ltv.max_ltv, dec256!(0.5));
        assert_eq!(ltv.safe_ltv, dec256!(0.35));

        assert_eq!(
            CollateralLtv::for_collateral(&whitelist, "terra1unknown", SAFE_RATIO),
            None
        );
    }

    #[tokio::test]
    async fn test_fetch_whitelist() {
        let querier = MockQuerier::new().with_wasm(OVERSEER, json!({"whitelist": {}}), whitelist());

        let whitelist = fetch_whitelist(&querier, OVERSEER).await.unwrap();
        assert_eq!(whitelist.elems.len(), 1);
        assert_eq!(whitelist.elems[0].symbol, "BLUNA");
    }
}
