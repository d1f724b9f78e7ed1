//! Receipts: labeled, formatted facts about a confirmed transaction.

mod bond;
mod swap;

use fastnum::D256;

use crate::{error::ParseError, num, tx::TxHelper, types::Event};

pub use bond::BondReceipts;
pub use swap::SwapReceipts;

/// Event emitted by CosmWasm contract executions.
pub const FROM_CONTRACT_EVENT: &str = "from_contract";

/// Display pair shown to the user once a transaction completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub name: String,
    pub value: String,
}

impl Receipt {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Builds receipts from the event of a confirmed transaction.
///
/// Attributes missing from the event only omit the receipts depending on
/// them; malformed values fail with a [`ParseError`].
pub trait ReceiptParser {
    /// Type of the event receipts are read from.
    fn event_type(&self) -> &str {
        FROM_CONTRACT_EVENT
    }

    /// Index of the message log the event is read from.
    fn log_index(&self) -> usize {
        0
    }

    fn receipts(&self, event: &Event, helper: &TxHelper) -> Result<Vec<Receipt>, ParseError>;
}

/// Numeric attribute value, `None` if the event doesn't carry it.
///
/// Amounts are `Uint128` on chain, anything outside of it is rejected.
pub fn decimal_attribute(event: &Event, key: &str) -> Result<Option<D256>, ParseError> {
    event
        .attribute(key)
        .map(|value| {
            let amount = num::parse(value).ok_or_else(|| ParseError::InvalidNumber {
                key: key.to_string(),
                value: value.to_string(),
            })?;
            if !num::fits_u128(amount) {
                return Err(ParseError::OutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(amount)
        })
        .transpose()
}

/// `numerator / denominator`, failing on a zero denominator.
pub(crate) fn ratio(
    numerator: D256,
    denominator: D256,
    what: &'static str,
) -> Result<D256, ParseError> {
    if denominator.is_zero() {
        return Err(ParseError::DivisionByZero(what));
    }
    Ok(numerator / denominator)
}

/// `"<amount> <symbol>"` for a micro-unit amount.
pub(crate) fn micro_amount(amount: D256, symbol: &str) -> String {
    format!(
        "{} {symbol}",
        num::format_with_postfix_units(num::Converter::micro().demicrofy(amount))
    )
}

#[cfg(test)]
mod tests {
    use fastnum::dec256;

    use super::*;
    use crate::types::Attribute;

    #[test]
    fn test_decimal_attribute() {
        let event = Event::new(
            FROM_CONTRACT_EVENT,
            vec![
                Attribute::new("offer_amount", "2000000"),
                Attribute::new("spread_amount", "n/a"),
            ],
        );

        assert_eq!(
            decimal_attribute(&event, "offer_amount").unwrap(),
            Some(dec256!(2000000))
        );
        assert_eq!(decimal_attribute(&event, "return_amount").unwrap(), None);
        assert_eq!(
            decimal_attribute(&event, "spread_amount").unwrap_err(),
            ParseError::InvalidNumber {
                key: "spread_amount".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(dec256!(1), dec256!(2), "price").unwrap(), dec256!(0.5));
        assert_eq!(
            ratio(dec256!(1), D256::ZERO, "price").unwrap_err(),
            ParseError::DivisionByZero("price")
        );
    }

    #[test]
    fn test_micro_amount() {
        assert_eq!(micro_amount(dec256!(1234567890), "ANC"), "1,234.567 ANC");
        assert_eq!(micro_amount(dec256!(2500000000000), "UST"), "2.500M UST");
    }
}
