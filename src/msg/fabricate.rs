use fastnum::D256;

use super::{Asset, ContractMessage, ExecuteMsg};
use crate::{
    AddressProvider,
    error::ValidationError,
    num,
    types::{
        self, ACCOUNT_PREFIX, BondIntent, Coin, RegisterValidatorIntent, SwapIntent,
        VALIDATOR_PREFIX, denom,
    },
};

/// Turns an intent into contract messages.
///
/// Implementations validate the intent before resolving any contract
/// address, and never return an empty message list on success.
pub trait Fabricate {
    fn fabricate<A>(&self, addresses: &A) -> Result<Vec<ContractMessage>, ValidationError>
    where
        A: AddressProvider + ?Sized;
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if types::is_bech32_address(address, ACCOUNT_PREFIX) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAddress(address.to_string()))
    }
}

pub fn validate_validator_address(address: &str) -> Result<(), ValidationError> {
    if types::is_bech32_address(address, VALIDATOR_PREFIX) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValidatorAddress(address.to_string()))
    }
}

/// Checks the amount is a number, then that it is strictly positive.
pub fn validate_amount(amount: &str) -> Result<D256, ValidationError> {
    let value = num::parse(amount).ok_or_else(|| ValidationError::NotANumber(amount.to_string()))?;
    if value <= D256::ZERO {
        return Err(ValidationError::NotPositive(amount.to_string()));
    }
    Ok(value)
}

/// Display amount to an integer micro-unit string.
///
/// Fails if the amount doesn't fit a `Uint128` or is below one micro-unit.
fn micro_amount(amount: &str) -> Result<String, ValidationError> {
    let value = validate_amount(amount)?;
    let micro = num::to_u128(num::Converter::micro().microfy(value))
        .ok_or_else(|| ValidationError::TooLarge(amount.to_string()))?;
    if micro == 0 {
        return Err(ValidationError::NotPositive(amount.to_string()));
    }
    Ok(micro.to_string())
}

impl Fabricate for SwapIntent {
    fn fabricate<A>(&self, addresses: &A) -> Result<Vec<ContractMessage>, ValidationError>
    where
        A: AddressProvider + ?Sized,
    {
        validate_address(&self.address)?;
        let amount = micro_amount(&self.amount)?;

        Ok(vec![ContractMessage::new(
            &self.address,
            addresses.anc_ust_pair(),
            ExecuteMsg::Swap {
                offer_asset: Asset::native(&self.denom, &amount),
                belief_price: self.belief_price.clone(),
                max_spread: self.max_spread.clone(),
                to: self.to.clone(),
            },
            vec![Coin::new(&self.denom, amount)],
        )])
    }
}

impl Fabricate for BondIntent {
    fn fabricate<A>(&self, addresses: &A) -> Result<Vec<ContractMessage>, ValidationError>
    where
        A: AddressProvider + ?Sized,
    {
        validate_address(&self.address)?;
        let amount = micro_amount(&self.amount)?;
        validate_validator_address(&self.validator)?;

        Ok(vec![ContractMessage::new(
            &self.address,
            addresses.basset_hub(),
            ExecuteMsg::Bond {
                validator: self.validator.clone(),
            },
            vec![Coin::new(denom::ULUNA, amount)],
        )])
    }
}

impl Fabricate for RegisterValidatorIntent {
    fn fabricate<A>(&self, addresses: &A) -> Result<Vec<ContractMessage>, ValidationError>
    where
        A: AddressProvider + ?Sized,
    {
        validate_address(&self.address)?;
        validate_validator_address(&self.validator)?;

        Ok(vec![ContractMessage::new(
            &self.address,
            addresses.basset_hub(),
            ExecuteMsg::RegisterValidator {
                validator: self.validator.clone(),
            },
            vec![],
        )])
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::testing::{TEST_ADDRESS, TEST_VALIDATOR, TestAddresses};

    /// Counts address lookups to prove validation happens first.
    #[derive(Default)]
    struct CountingAddresses {
        inner: TestAddresses,
        lookups: Cell<usize>,
    }

    impl AddressProvider for CountingAddresses {
        fn anc_ust_pair(&self) -> &str {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.anc_ust_pair()
        }

        fn overseer(&self) -> &str {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.overseer()
        }

        fn basset_hub(&self) -> &str {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.basset_hub()
        }

        fn basset_token(&self) -> &str {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.basset_token()
        }
    }

    #[test]
    fn test_swap_fabrication() {
        let addresses = TestAddresses::default();
        let intent = SwapIntent::new(TEST_ADDRESS, "10.5", denom::UUSD)
            .with_belief_price("2.5")
            .with_max_spread("0.01");

        let msgs = intent.fabricate(&addresses).unwrap();
        assert_eq!(msgs.len(), 1);

        let msg = &msgs[0];
        assert_eq!(msg.sender, TEST_ADDRESS);
        assert_eq!(msg.contract, addresses.anc_ust_pair());
        assert_eq!(msg.coins, vec![Coin::new(denom::UUSD, "10500000")]);
        assert_eq!(
            msg.execute_msg_json().unwrap(),
            r#"{"swap":{"offer_asset":{"info":{"native_token":{"denom":"uusd"}},"amount":"10500000"},"belief_price":"2.5","max_spread":"0.01"}}"#
        );
    }

    #[test]
    fn test_swap_fabrication_truncates_micro_amount() {
        let msgs = SwapIntent::new(TEST_ADDRESS, "1.0000009", denom::UUSD)
            .fabricate(&TestAddresses::default())
            .unwrap();
        assert_eq!(msgs[0].coins[0].amount, "1000000");
    }

    #[test]
    fn test_fabrication_is_deterministic() {
        let addresses = TestAddresses::default();
        let intent = SwapIntent::new(TEST_ADDRESS, "3", denom::UUSD).with_recipient(TEST_ADDRESS);

        let a = intent.fabricate(&addresses).unwrap();
        let b = intent.fabricate(&addresses).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].to_json().unwrap(), b[0].to_json().unwrap());
    }

    #[test]
    fn test_validation_order() {
        let addresses = CountingAddresses::default();

        // address is checked before the amount
        assert_eq!(
            SwapIntent::new("", "abc", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::InvalidAddress("".to_string()))
        );
        assert_eq!(
            SwapIntent::new(TEST_ADDRESS, "abc", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            SwapIntent::new(TEST_ADDRESS, "", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::NotANumber("".to_string()))
        );
        assert_eq!(
            SwapIntent::new(TEST_ADDRESS, "0", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::NotPositive("0".to_string()))
        );
        assert_eq!(
            SwapIntent::new(TEST_ADDRESS, "-5", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::NotPositive("-5".to_string()))
        );

        assert_eq!(addresses.lookups.get(), 0);
    }

    #[test]
    fn test_non_finite_amounts() {
        let addresses = TestAddresses::default();
        for amount in ["NaN", "nan", "inf", "Infinity", "-inf"] {
            assert_eq!(
                SwapIntent::new(TEST_ADDRESS, amount, denom::UUSD).fabricate(&addresses),
                Err(ValidationError::NotANumber(amount.to_string()))
            );
            assert_eq!(
                BondIntent::new(TEST_ADDRESS, amount, TEST_VALIDATOR).fabricate(&addresses),
                Err(ValidationError::NotANumber(amount.to_string()))
            );
        }
    }

    #[test]
    fn test_amount_bounds() {
        let addresses = TestAddresses::default();

        // wider than Uint128 once in micro-units
        for amount in ["1e80", "1e1000", "340282366920938463463374607431768211456"] {
            assert_eq!(
                SwapIntent::new(TEST_ADDRESS, amount, denom::UUSD).fabricate(&addresses),
                Err(ValidationError::TooLarge(amount.to_string()))
            );
        }

        // below one micro-unit
        assert_eq!(
            SwapIntent::new(TEST_ADDRESS, "0.0000001", denom::UUSD).fabricate(&addresses),
            Err(ValidationError::NotPositive("0.0000001".to_string()))
        );

        let msgs = SwapIntent::new(TEST_ADDRESS, "0.000001", denom::UUSD)
            .fabricate(&addresses)
            .unwrap();
        assert_eq!(msgs[0].coins[0].amount, "1");
    }

    #[test]
    fn test_bond_fabrication() {
        let addresses = TestAddresses::default();
        let msgs = BondIntent::new(TEST_ADDRESS, "5", TEST_VALIDATOR)
            .fabricate(&addresses)
            .unwrap();

        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].contract, addresses.basset_hub());
        assert_eq!(msgs[0].coins, vec![Coin::new(denom::ULUNA, "5000000")]);
        assert_eq!(
            msgs[0].execute_msg,
            ExecuteMsg::Bond {
                validator: TEST_VALIDATOR.to_string()
            }
        );

        assert_eq!(
            BondIntent::new(TEST_ADDRESS, "5", TEST_ADDRESS).fabricate(&addresses),
            Err(ValidationError::InvalidValidatorAddress(TEST_ADDRESS.to_string()))
        );
    }

    #[test]
    fn test_register_validator_fabrication() {
        let addresses = CountingAddresses::default();
        let msgs = RegisterValidatorIntent::new(TEST_ADDRESS, TEST_VALIDATOR)
            .fabricate(&addresses)
            .unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].coins.is_empty());
        assert_eq!(addresses.lookups.get(), 1);

        assert!(matches!(
            RegisterValidatorIntent::new("terra1", TEST_VALIDATOR).fabricate(&addresses),
            Err(ValidationError::InvalidAddress(_))
        ));
    }
}
