use std::time::Duration;

use fastnum::D256;
use serde_json::json;

use crate::{
    error::BuildError,
    msg::ContractMessage,
    num,
    types::{Coin, denom},
};

/// Stability tax applied to native UST transfers.
#[derive(Clone, Copy, derive_more::Debug, PartialEq)]
pub struct Tax {
    #[debug("{rate}")]
    pub rate: D256,
    /// Maximum tax per transaction, in micro UST.
    #[debug("{cap}")]
    pub cap: D256,
}

/// Fee and gas parameters used to build transactions.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct TxConfig {
    /// Gas limit.
    pub gas_fee: u64,
    #[debug("{gas_adjustment}")]
    pub gas_adjustment: D256,
    /// Fee attached to the transaction, in micro UST.
    #[debug("{tx_fee}")]
    pub tx_fee: D256,
    /// Gas part of the fee reported in receipts, in micro UST.
    #[debug("{fixed_gas}")]
    pub fixed_gas: D256,
    pub tax: Tax,
}

/// Confirmation polling parameters.
///
/// Pipelines refuse to run with a zero `interval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    /// Total waiting time after which the outcome is reported as unknown.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Transaction fee: gas limit and the attached coins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fee {
    pub gas: u64,
    pub amount: Vec<Coin>,
}

/// Broadcast-ready transaction options.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct TxOptions {
    pub msgs: Vec<ContractMessage>,
    pub fee: Fee,
    #[debug("{gas_adjustment}")]
    pub gas_adjustment: D256,
}

impl TxOptions {
    /// Combines messages with the configured fee and gas adjustment.
    pub fn build(msgs: Vec<ContractMessage>, config: &TxConfig) -> Result<Self, BuildError> {
        if msgs.is_empty() {
            return Err(BuildError::NoMessages);
        }
        if config.gas_fee == 0 {
            return Err(BuildError::ZeroGas);
        }
        if config.gas_adjustment <= D256::ZERO {
            return Err(BuildError::InvalidGasAdjustment(config.gas_adjustment.to_string()));
        }
        if config.tx_fee.is_negative() {
            return Err(BuildError::NegativeFee(config.tx_fee.to_string()));
        }
        let fee_amount = num::to_u128(config.tx_fee)
            .ok_or_else(|| BuildError::FeeOverflow(config.tx_fee.to_string()))?;

        Ok(Self {
            msgs,
            fee: Fee {
                gas: config.gas_fee,
                amount: vec![Coin::new(denom::UUSD, fee_amount.to_string())],
            },
            gas_adjustment: config.gas_adjustment,
        })
    }

    /// Fee amount in micro UST.
    pub fn fee_amount(&self) -> D256 {
        self.fee
            .amount
            .iter()
            .filter(|c| c.denom == denom::UUSD)
            .filter_map(|c| num::parse(&c.amount))
            .fold(D256::ZERO, |acc, a| acc + a)
    }

    /// JSON form handed over to the wallet for signing.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let msgs = self
            .msgs
            .iter()
            .map(ContractMessage::to_amino_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            "msgs": msgs,
            "fee": {
                "gas": self.fee.gas.to_string(),
                "amount": self.fee.amount,
            },
            "gasAdjustment": self.gas_adjustment.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use fastnum::dec256;

    use super::*;
    use crate::{msg::ExecuteMsg, testing};

    fn msgs() -> Vec<ContractMessage> {
        vec![ContractMessage::new(
            testing::TEST_ADDRESS,
            "terra1hub",
            ExecuteMsg::RegisterValidator {
                validator: testing::TEST_VALIDATOR.to_string(),
            },
            vec![],
        )]
    }

    #[test]
    fn test_build_floors_fee() {
        let mut config = testing::tx_config();
        config.tx_fee = dec256!(150000.75);

        let options = TxOptions::build(msgs(), &config).unwrap();
        assert_eq!(options.fee.gas, config.gas_fee);
        assert_eq!(options.fee.amount, vec![Coin::new(denom::UUSD, "150000")]);
        assert_eq!(options.fee_amount(), dec256!(150000));
        assert_eq!(options.gas_adjustment, config.gas_adjustment);
    }

    #[test]
    fn test_build_rejects_invalid_parameters() {
        let config = testing::tx_config();
        assert_eq!(TxOptions::build(vec![], &config), Err(BuildError::NoMessages));

        let mut zero_gas = config.clone();
        zero_gas.gas_fee = 0;
        assert_eq!(TxOptions::build(msgs(), &zero_gas), Err(BuildError::ZeroGas));

        let mut bad_adjustment = config.clone();
        bad_adjustment.gas_adjustment = dec256!(0);
        assert!(matches!(
            TxOptions::build(msgs(), &bad_adjustment),
            Err(BuildError::InvalidGasAdjustment(_))
        ));

        let mut negative = config.clone();
        negative.tx_fee = dec256!(-1);
        assert!(matches!(
            TxOptions::build(msgs(), &negative),
            Err(BuildError::NegativeFee(_))
        ));

        let mut overflow = config;
        overflow.tx_fee = dec256!(1000000000000000000000000000000000000000000);
        assert!(matches!(
            TxOptions::build(msgs(), &overflow),
            Err(BuildError::FeeOverflow(_))
        ));
    }

    #[test]
    fn test_options_json() {
        let options = TxOptions::build(msgs(), &testing::tx_config()).unwrap();
        let json = options.to_json().unwrap();
        assert_eq!(json["fee"]["gas"], testing::tx_config().gas_fee.to_string());
        assert_eq!(json["fee"]["amount"][0]["denom"], "uusd");
        assert_eq!(json["msgs"][0]["type"], "wasm/MsgExecuteContract");
        assert_eq!(json["gasAdjustment"], "1.6");
    }
}
