use fastnum::D256;

use super::{Receipt, ReceiptParser, decimal_attribute, micro_amount, ratio};
use crate::{
    error::ParseError,
    num,
    tx::{Tax, TxConfig, TxHelper},
    types::Event,
};

/// Receipts of a UST → ANC swap on the ANC/UST pair.
#[derive(Clone, derive_more::Debug)]
pub struct SwapReceipts {
    #[debug("{fixed_gas}")]
    fixed_gas: D256,
    tax: Tax,
}

impl SwapReceipts {
    pub fn new(config: &TxConfig) -> Self {
        Self {
            fixed_gas: config.fixed_gas,
            tax: config.tax,
        }
    }

    /// Fixed gas plus the stability tax on the offered UST, in micro UST.
    pub fn tx_fee(&self, offer_amount: D256) -> D256 {
        self.fixed_gas + num::min(offer_amount * self.tax.rate, self.tax.cap)
    }
}

impl ReceiptParser for SwapReceipts {
    fn receipts(&self, event: &Event, helper: &TxHelper) -> Result<Vec<Receipt>, ParseError> {
        let return_amount = decimal_attribute(event, "return_amount")?;
        let offer_amount = decimal_attribute(event, "offer_amount")?;
        let spread_amount = decimal_attribute(event, "spread_amount")?;
        let commission_amount = decimal_attribute(event, "commission_amount")?;

        let price = match (return_amount, offer_amount) {
            (Some(r), Some(o)) => Some(ratio(r, o, "Paid/Bought")?),
            _ => None,
        };
        let trading_fee = match (spread_amount, commission_amount) {
            (Some(s), Some(c)) => Some(s + c),
            _ => None,
        };
        let tx_fee = offer_amount.map(|o| self.tx_fee(o));

        Ok([
            return_amount.map(|r| Receipt::new("Bought", micro_amount(r, "ANC"))),
            offer_amount.map(|o| Receipt::new("Paid", micro_amount(o, "UST"))),
            price.map(|p| {
                Receipt::new(
                    "Paid/Bought",
                    format!("{} UST", num::format_with_postfix_units(p)),
                )
            }),
            trading_fee.map(|f| Receipt::new("Trading Fee", micro_amount(f, "ANC"))),
            helper.tx_hash_receipt(),
            helper.tx_fee_receipt(tx_fee),
        ]
        .into_iter()
        .flatten()
        .collect())
    }
}

#[cfg(test)]
mod tests {
    use fastnum::dec256;

    use super::*;
    use crate::{
        testing,
        types::{Attribute, TxHash},
    };

    fn event(attrs: &[(&str, &str)]) -> Event {
        Event::new(
            "from_contract",
            attrs.iter().map(|(k, v)| Attribute::new(*k, *v)).collect(),
        )
    }

    fn names(receipts: &[Receipt]) -> Vec<&str> {
        receipts.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_full_receipts() {
        let parser = SwapReceipts::new(&testing::tx_config());
        let helper = TxHelper::broadcast(TxHash::new("ABCD"), dec256!(100000));

        let receipts = parser
            .receipts(
                &event(&[
                    ("return_amount", "1000000"),
                    ("offer_amount", "2000000"),
                    ("spread_amount", "1500"),
                    ("commission_amount", "3000"),
                ]),
                &helper,
            )
            .unwrap();

        assert_eq!(
            receipts,
            vec![
                Receipt::new("Bought", "1.000 ANC"),
                Receipt::new("Paid", "2.000 UST"),
                Receipt::new("Paid/Bought", "0.500 UST"),
                Receipt::new("Trading Fee", "0.004 ANC"),
                Receipt::new("Tx Hash", "ABCD"),
                // 0.1 UST fixed gas + 0.1% tax on 2 UST
                Receipt::new("Tx Fee", "0.102 UST"),
            ]
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let parser = SwapReceipts::new(&testing::tx_config());
        let helper = TxHelper::broadcast(TxHash::new("ABCD"), dec256!(150000));

        let receipts = parser
            .receipts(&event(&[("return_amount", "1000000"), ("spread_amount", "1")]), &helper)
            .unwrap();

        assert_eq!(names(&receipts), vec!["Bought", "Tx Hash", "Tx Fee"]);
        // without an offer the saved fee is reported
        assert_eq!(receipts[2].value, "0.150 UST");

        let receipts = parser.receipts(&event(&[]), &TxHelper::new()).unwrap();
        assert!(receipts.is_empty());
    }

    #[test]
    fn test_tax_is_capped() {
        let parser = SwapReceipts::new(&testing::tx_config());
        assert_eq!(parser.tx_fee(dec256!(2000000)), dec256!(102000));
        assert_eq!(
            parser.tx_fee(dec256!(100000000000)),
            testing::tx_config().fixed_gas + testing::tx_config().tax.cap
        );
    }

    #[test]
    fn test_malformed_and_zero_offer() {
        let parser = SwapReceipts::new(&testing::tx_config());
        let helper = TxHelper::new();

        assert!(matches!(
            parser.receipts(&event(&[("offer_amount", "2,000")]), &helper),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert_eq!(
            parser.receipts(
                &event(&[("return_amount", "1"), ("offer_amount", "0")]),
                &helper
            ),
            Err(ParseError::DivisionByZero("Paid/Bought"))
        );
    }

    #[test]
    fn test_non_finite_and_out_of_range_amounts() {
        let parser = SwapReceipts::new(&testing::tx_config());
        let helper = TxHelper::new();

        for value in ["NaN", "inf", "-Infinity"] {
            assert_eq!(
                parser.receipts(&event(&[("return_amount", value)]), &helper),
                Err(ParseError::InvalidNumber {
                    key: "return_amount".to_string(),
                    value: value.to_string(),
                })
            );
        }
        for value in ["1e1000", "-1"] {
            assert_eq!(
                parser.receipts(&event(&[("return_amount", value)]), &helper),
                Err(ParseError::OutOfRange {
                    key: "return_amount".to_string(),
                    value: value.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let parser = SwapReceipts::new(&testing::tx_config());
        let helper = TxHelper::broadcast(TxHash::new("AB"), dec256!(1));
        let event = event(&[("return_amount", "7"), ("offer_amount", "3")]);
        assert_eq!(
            parser.receipts(&event, &helper).unwrap(),
            parser.receipts(&event, &helper).unwrap()
        );
    }
}
