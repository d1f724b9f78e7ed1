use super::{Receipt, ReceiptParser, decimal_attribute, micro_amount, ratio};
use crate::{error::ParseError, num, tx::TxHelper, types::Event};

/// Receipts of a LUNA → bLUNA bond on the bAsset hub.
#[derive(Clone, Copy, Debug, Default)]
pub struct BondReceipts;

impl ReceiptParser for BondReceipts {
    fn receipts(&self, event: &Event, helper: &TxHelper) -> Result<Vec<Receipt>, ParseError> {
        let bonded = decimal_attribute(event, "bonded")?;
        let minted = decimal_attribute(event, "minted")?;

        let exchange_rate = match (bonded, minted) {
            (Some(b), Some(m)) => Some(ratio(b, m, "Exchange Rate")?),
            _ => None,
        };

        Ok([
            bonded.map(|b| Receipt::new("Bonded", micro_amount(b, "LUNA"))),
            minted.map(|m| Receipt::new("Minted", micro_amount(m, "bLUNA"))),
            exchange_rate.map(|r| Receipt::new("Exchange Rate", num::format_fixed(r, 6))),
            helper.tx_hash_receipt(),
            helper.tx_fee_receipt(None),
        ]
        .into_iter()
        .flatten()
        .collect())
    }
}
