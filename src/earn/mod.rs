//! Deposit rate projection.
//!
//! The overseer re-evaluates the deposit rate once per epoch, based on how
//! the yield reserve moved since the previous evaluation:
//!
//! 1. [`yield_reserve_change`] computes the relative reserve change and
//!    whether the rate should move up or down. If the reserve didn't grow
//!    more than the expected increase, the rate goes down.
//! 2. [`new_rate`] applies that change to the current annual rate and
//!    clamps the per-block result to the configured bounds.
//!
//! [`project`] composes both into the rate expected for the next epoch,
//! [`fetch_apy_projection`] does the same from the live overseer state.

mod overseer;

use fastnum::D256;

use crate::{NetworkInfo, num};

pub use overseer::*;

/// Yield reserve balance at the last evaluation and now.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct ReserveState {
    #[debug("{previous_balance}")]
    pub previous_balance: D256,
    #[debug("{current_balance}")]
    pub current_balance: D256,
}

/// Dynamic rate bounds of the overseer, rates are per block.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct RateConfig {
    #[debug("{min_rate}")]
    pub min_rate: D256,
    #[debug("{max_rate}")]
    pub max_rate: D256,
    /// Maximum change applied per epoch.
    #[debug("{max_change}")]
    pub max_change: D256,
    /// Expected relative reserve increase per epoch.
    #[debug("{increase_expectation}")]
    pub increase_expectation: D256,
    /// Current deposit rate.
    #[debug("{threshold_rate}")]
    pub threshold_rate: D256,
    /// Epoch length in blocks.
    pub epoch_length: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Higher,
    Lower,
}

/// Relative reserve change and the direction it moves the rate.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct ReserveChange {
    pub direction: Direction,
    #[debug("{change}")]
    pub change: D256,
}

/// Projected deposit rate and the height it takes effect at.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct YieldProjection {
    /// Annualized rate.
    #[debug("{rate}")]
    pub rate: D256,
    pub height: u64,
}

/// `|current - previous| / previous`, or `1` when there was no reserve.
pub fn reserve_growth(reserve: &ReserveState) -> D256 {
    let previous = reserve.previous_balance;
    if previous.is_zero() {
        return D256::ONE;
    }
    num::abs(reserve.current_balance - previous) / previous
}

pub fn yield_reserve_change(reserve: &ReserveState, config: &RateConfig) -> ReserveChange {
    let expectation = config.increase_expectation;
    let mut change = reserve_growth(reserve);

    let direction = if reserve.current_balance <= reserve.previous_balance {
        change = change + expectation;
        Direction::Lower
    } else if change > expectation {
        change = change - expectation;
        Direction::Higher
    } else {
        // grew, but less than expected
        Direction::Lower
    };

    ReserveChange {
        direction,
        change: num::min(change, config.max_change),
    }
}

/// Per-block rate after applying `change` to the current rate.
///
/// Always within `[min_rate, max_rate]`. `blocks_per_year` must not be zero.
pub fn new_rate(config: &RateConfig, change: &ReserveChange, blocks_per_year: u64) -> D256 {
    let blocks_per_year = D256::from(blocks_per_year);
    let clamp = |annual: D256| {
        num::max(
            num::min(annual / blocks_per_year, config.max_rate),
            config.min_rate,
        )
    };

    let current = config.threshold_rate * blocks_per_year;
    match change.direction {
        Direction::Higher => clamp(current + change.change),
        Direction::Lower if current > change.change => clamp(current - change.change),
        Direction::Lower => clamp(D256::ZERO),
    }
}

/// Projection of the next epoch's annual deposit rate.
///
/// `None` on mainnet, where the projection isn't offered, and for networks
/// without a block rate.
pub fn project(
    network: &NetworkInfo,
    reserve: &ReserveState,
    config: &RateConfig,
    last_executed_height: u64,
) -> Option<YieldProjection> {
    if network.is_mainnet() || network.blocks_per_year() == 0 {
        return None;
    }

    let change = yield_reserve_change(reserve, config);
    let rate = new_rate(config, &change, network.blocks_per_year());
    Some(YieldProjection {
        rate: rate * D256::from(network.blocks_per_year()),
        height: last_executed_height.saturating_add(config.epoch_length),
    })
}
