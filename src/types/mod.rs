mod event;
mod intent;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use event::*;
pub use intent::{BondIntent, RegisterValidatorIntent, SwapIntent};

/// Native micro-denominations.
pub mod denom {
    pub const UUSD: &str = "uusd";
    pub const ULUNA: &str = "uluna";
}

/// Human-readable part of account addresses.
pub const ACCOUNT_PREFIX: &str = "terra";

/// Human-readable part of validator operator addresses.
pub const VALIDATOR_PREFIX: &str = "terravaloper";

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Length of the bech32 data part (20-byte payload plus checksum).
const BECH32_DATA_LEN: usize = 38;

/// Checks that `address` is shaped as a bech32 address with the given prefix.
///
/// The checksum is not verified; the chain rejects such addresses anyway.
pub fn is_bech32_address(address: &str, prefix: &str) -> bool {
    let Some(data) = address
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
    else {
        return false;
    };
    data.len() == BECH32_DATA_LEN && data.chars().all(|c| BECH32_CHARSET.contains(c))
}

/// Hash of a transaction, as reported by the node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Amount of a native denomination, in micro-units.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bech32_address_shape() {
        assert!(is_bech32_address(
            "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v",
            ACCOUNT_PREFIX
        ));
        assert!(is_bech32_address(
            "terravaloper1krj7amhhagjnyg2tkkuh6l0550y733jnjnnlzy",
            VALIDATOR_PREFIX
        ));
        // wrong prefix
        assert!(!is_bech32_address(
            "cosmos1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v",
            ACCOUNT_PREFIX
        ));
        // validator address is not an account address
        assert!(!is_bech32_address(
            "terravaloper1krj7amhhagjnyg2tkkuh6l0550y733jnjnnlzy",
            ACCOUNT_PREFIX
        ));
        // too short
        assert!(!is_bech32_address("terra1x46rqay4d3", ACCOUNT_PREFIX));
        // 'b' is outside of the bech32 charset
        assert!(!is_bech32_address(
            "terra1b46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v",
            ACCOUNT_PREFIX
        ));
        assert!(!is_bech32_address("", ACCOUNT_PREFIX));
    }

    #[test]
    fn test_coin_display() {
        assert_eq!(Coin::new(denom::UUSD, "1500000").to_string(), "1500000uusd");
    }
}
