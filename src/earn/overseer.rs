use fastnum::D256;
use serde::Deserialize;
use tracing::{debug, info};

use super::{RateConfig, ReserveState, YieldProjection, project};
use crate::{
    NetworkInfo,
    error::QueryError,
    msg::OverseerQuery,
    num::deserialize_decimal,
    query::{ContractQuerier, native_balance},
    types::denom,
};

/// Response of the overseer `dynrate_state {}` query.
#[derive(Clone, derive_more::Debug, PartialEq, Deserialize)]
pub struct DynRateStateResponse {
    pub last_executed_height: u64,
    #[debug("{prev_yield_reserve}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub prev_yield_reserve: D256,
}

/// Subset of the overseer `config {}` response used by the projection.
#[derive(Clone, derive_more::Debug, PartialEq, Deserialize)]
pub struct ConfigResponse {
    #[debug("{threshold_deposit_rate}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub threshold_deposit_rate: D256,
    #[debug("{dyn_rate_min}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub dyn_rate_min: D256,
    #[debug("{dyn_rate_max}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub dyn_rate_max: D256,
    #[debug("{dyn_rate_maxchange}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub dyn_rate_maxchange: D256,
    #[debug("{dyn_rate_yr_increase_expectation}")]
    #[serde(deserialize_with = "deserialize_decimal")]
    pub dyn_rate_yr_increase_expectation: D256,
    pub dyn_rate_epoch: u64,
}

impl From<&ConfigResponse> for RateConfig {
    fn from(config: &ConfigResponse) -> Self {
        Self {
            min_rate: config.dyn_rate_min,
            max_rate: config.dyn_rate_max,
            max_change: config.dyn_rate_maxchange,
            increase_expectation: config.dyn_rate_yr_increase_expectation,
            threshold_rate: config.threshold_deposit_rate,
            epoch_length: config.dyn_rate_epoch,
        }
    }
}

/// Projects the next-epoch deposit rate from the current overseer state.
///
/// Returns `Ok(None)` without querying anything on mainnet. The overseer
/// state, config and `uusd` balance are queried concurrently.
pub async fn fetch_apy_projection<C>(
    querier: &C,
    network: &NetworkInfo,
    overseer: &str,
) -> Result<Option<YieldProjection>, QueryError>
where
    C: ContractQuerier + ?Sized,
{
    if network.is_mainnet() {
        debug!(network = network.name(), "APY projection unavailable");
        return Ok(None);
    }

    let (state, config, balance) = futures::try_join!(
        querier.wasm_query::<_, DynRateStateResponse>(overseer, &OverseerQuery::DynrateState {}),
        querier.wasm_query::<_, ConfigResponse>(overseer, &OverseerQuery::Config {}),
        native_balance(querier, overseer, denom::UUSD),
    )?;

    let reserve = ReserveState {
        previous_balance: state.prev_yield_reserve,
        current_balance: balance,
    };
    let projection = project(
        network,
        &reserve,
        &RateConfig::from(&config),
        state.last_executed_height,
    );
    info!(?reserve, ?projection, "APY projection");

    Ok(projection)
}

#[cfg(test)]
mod tests {
    use fastnum::dec256;
    use serde_json::json;

    use super::*;
    use crate::{testing::MockQuerier, types::Coin};

    const OVERSEER: &str = "terra1qljxd0y3j3gk97025qvl3lgq8ygup4gsksvaxv";

    fn overseer_querier(balance: &str) -> MockQuerier {
        MockQuerier::new()
            .with_wasm(
                OVERSEER,
                json!({"dynrate_state": {}}),
                json!({"last_executed_height": 7_000_000, "prev_yield_reserve": "1000000000"}),
            )
            .with_wasm(
                OVERSEER,
                json!({"config": {}}),
                json!({
                    "owner_addr": "terra1owner",
                    "threshold_deposit_rate": "0.000000035",
                    "dyn_rate_min": "0.000000030572045778",
                    "dyn_rate_max": "0.000000040762727704",
                    "dyn_rate_maxchange": "0.03",
                    "dyn_rate_yr_increase_expectation": "0.001",
                    "dyn_rate_epoch": 100800,
                }),
            )
            .with_balances(OVERSEER, vec![Coin::new(denom::UUSD, balance)])
    }

    #[test]
    fn test_decode_config() {
        let config: ConfigResponse = serde_json::from_value(json!({
            "threshold_deposit_rate": "0.000000035",
            "dyn_rate_min": "0.00000003",
            "dyn_rate_max": "0.00000004",
            "dyn_rate_maxchange": "0.03",
            "dyn_rate_yr_increase_expectation": "0.001",
            "dyn_rate_epoch": 100800,
            "price_timeframe": 60,
        }))
        .unwrap();

        let rate_config = RateConfig::from(&config);
        assert_eq!(rate_config.threshold_rate, dec256!(0.000000035));
        assert_eq!(rate_config.max_change, dec256!(0.03));
        assert_eq!(rate_config.epoch_length, 100800);

        assert!(
            serde_json::from_value::<ConfigResponse>(json!({"threshold_deposit_rate": 1})).is_err()
        );
    }

    #[test]
    fn test_decode_non_finite_reserve() {
        for reserve in ["NaN", "inf"] {
            assert!(
                serde_json::from_value::<DynRateStateResponse>(json!({
                    "last_executed_height": 1,
                    "prev_yield_reserve": reserve,
                }))
                .is_err()
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_projection() {
        let querier = overseer_querier("1100000000");

        let projection = fetch_apy_projection(&querier, &NetworkInfo::testnet(), OVERSEER)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(projection.height, 7_100_800);
        // 10% reserve growth moves the rate up by the capped 3%, above max
        assert_eq!(
            projection.rate,
            dec256!(0.000000040762727704) * D256::from(crate::BLOCKS_PER_YEAR)
        );
        assert_eq!(querier.wasm_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_projection_mainnet_unavailable() {
        let querier = overseer_querier("1100000000");

        let projection = fetch_apy_projection(&querier, &NetworkInfo::mainnet(), OVERSEER)
            .await
            .unwrap();

        assert_eq!(projection, None);
        assert_eq!(querier.wasm_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_projection_query_error() {
        let querier = MockQuerier::new();
        let result = fetch_apy_projection(&querier, &NetworkInfo::testnet(), OVERSEER).await;
        assert!(result.is_err());
    }
}
