use serde::{Deserialize, Deserializer, Serialize};

use super::TxHash;

/// Key/value attribute of an on-chain event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Event emitted by a message execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Log of a single message within a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLog {
    #[serde(default)]
    pub msg_index: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Confirmed transaction as returned by the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    pub txhash: TxHash,
    #[serde(deserialize_with = "deserialize_height")]
    pub height: u64,
    /// Non-zero when the transaction failed on-chain.
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Option<Vec<TxLog>>,
}

impl Event {
    pub fn new(r#type: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            r#type: r#type.into(),
            attributes,
        }
    }

    /// Value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl TxLog {
    /// First event of the given type.
    pub fn event(&self, r#type: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.r#type == r#type)
    }
}

impl TxInfo {
    /// Log of the message at `index`, if the transaction has one.
    pub fn raw_log(&self, index: usize) -> Option<&TxLog> {
        self.logs.as_ref().and_then(|logs| logs.get(index))
    }

    pub fn is_failed(&self) -> bool {
        self.code != 0
    }
}

fn deserialize_height<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Height {
        Num(u64),
        Str(String),
    }

    match Height::deserialize(deserializer)? {
        Height::Num(h) => Ok(h),
        Height::Str(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid height: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LCD_TX: &str = r#"{
        "height": "4213543",
        "txhash": "9A1C2D8E7F6B5A4C3D2E1F0A9B8C7D6E5F4A3B2C1D0E9F8A7B6C5D4E3F2A1B0C",
        "raw_log": "[]",
        "logs": [{
            "msg_index": 0,
            "log": "",
            "events": [
                {"type": "message", "attributes": [{"key": "action", "value": "execute_contract"}]},
                {"type": "from_contract", "attributes": [
                    {"key": "contract_address", "value": "terra1gm5p3ner9x9xpwugn9sp6gvhd0lwrtkyrecdn3"},
                    {"key": "action", "value": "swap"},
                    {"key": "offer_amount", "value": "2000000"},
                    {"key": "return_amount", "value": "1000000"}
                ]}
            ]
        }],
        "gas_wanted": "1000000",
        "gas_used": "412345"
    }"#;

    #[test]
    fn test_decode_lcd_tx() {
        let info: TxInfo = serde_json::from_str(LCD_TX).unwrap();
        assert_eq!(info.height, 4213543);
        assert_eq!(info.code, 0);
        assert!(!info.is_failed());

        let log = info.raw_log(0).unwrap();
        assert!(info.raw_log(1).is_none());

        let event = log.event("from_contract").unwrap();
        assert_eq!(event.attribute("action"), Some("swap"));
        assert_eq!(event.attribute("return_amount"), Some("1000000"));
        assert_eq!(event.attribute("spread_amount"), None);
        assert!(log.event("wasm").is_none());
    }

    #[test]
    fn test_decode_failed_tx_without_logs() {
        let info: TxInfo = serde_json::from_str(
            r#"{"height": 12, "txhash": "AB", "code": 5, "raw_log": "insufficient funds", "logs": null}"#,
        )
        .unwrap();
        assert!(info.is_failed());
        assert!(info.raw_log(0).is_none());
    }

    #[test]
    fn test_attribute_first_match() {
        let event = Event::new(
            "from_contract",
            vec![Attribute::new("amount", "1"), Attribute::new("amount", "2")],
        );
        assert_eq!(event.attribute("amount"), Some("1"));
    }
}
