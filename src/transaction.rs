//! Transaction model and its JSON file representation.
//!
//! A transaction carries either a batch of calls (the `0x76` type) or a single
//! legacy call. Integer amounts are persisted as decimal strings so that the
//! full 256-bit range survives a round trip.

use std::path::Path;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    utils::{read_json, write_json},
};

/// Type tag of batched-call transactions.
pub const BATCHED_TX_TYPE: u8 = 0x76;

/// One atomic invocation within a batched transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Batched(Vec<Call>),
    Legacy {
        to: Option<Address>,
        value: Option<U256>,
        data: Option<Bytes>,
    },
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Legacy {
            to: None,
            value: None,
            data: None,
        }
    }
}

/// The call that gets estimated and simulated for a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTarget {
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TransactionFile", into = "TransactionFile")]
pub struct Transaction {
    pub tx_type: Option<u8>,
    pub payload: Payload,
    pub nonce_key: Option<U256>,
    pub fee_token: Option<Address>,
    pub from: Option<Address>,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub nonce: Option<u64>,
    pub chain_id: Option<u64>,
}

impl Transaction {
    /// A `0x76` transaction on the protocol nonce sequence.
    pub fn batched(from: Option<Address>, calls: Vec<Call>) -> Self {
        Self {
            tx_type: Some(BATCHED_TX_TYPE),
            payload: Payload::Batched(calls),
            nonce_key: Some(U256::ZERO),
            from,
            ..Default::default()
        }
    }

    pub fn legacy(
        from: Option<Address>,
        to: Option<Address>,
        value: Option<U256>,
        data: Option<Bytes>,
    ) -> Self {
        Self {
            payload: Payload::Legacy { to, value, data },
            from,
            ..Default::default()
        }
    }

    /// Nonce sequence key; 0 selects the protocol-managed sequence.
    pub fn nonce_key(&self) -> U256 {
        self.nonce_key.unwrap_or_default()
    }

    pub fn calls(&self) -> &[Call] {
        match &self.payload {
            Payload::Batched(calls) => calls,
            Payload::Legacy { .. } => &[],
        }
    }

    /// Every `(to, value)` pair this transaction would act on.
    pub fn value_targets(&self) -> Vec<(Option<Address>, Option<U256>)> {
        match &self.payload {
            Payload::Batched(calls) => calls.iter().map(|call| (call.to, call.value)).collect(),
            Payload::Legacy { to, value, .. } => vec![(*to, *value)],
        }
    }

    /// Only the first call of a batch is estimated and simulated.
    pub fn call_target(&self) -> CallTarget {
        match &self.payload {
            Payload::Batched(calls) => calls
                .first()
                .map(|call| CallTarget {
                    to: call.to,
                    data: call.input.clone(),
                    value: call.value,
                })
                .unwrap_or_default(),
            Payload::Legacy { to, value, data } => CallTarget {
                to: *to,
                data: data.clone(),
                value: *value,
            },
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Flat on-disk shape. Both `calls` and legacy fields may be present in a
/// hand-written file; a non-empty `calls` list takes precedence. An empty
/// list only stands for an empty batch when no legacy field is set.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionFile {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    tx_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calls: Option<Vec<Call>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    nonce_key: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fee_token: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    gas_price: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal")]
    max_priority_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_id: Option<u64>,
}

impl From<TransactionFile> for Transaction {
    fn from(file: TransactionFile) -> Self {
        let has_legacy = file.to.is_some() || file.value.is_some() || file.data.is_some();
        let payload = match file.calls {
            Some(calls) if !calls.is_empty() || !has_legacy => Payload::Batched(calls),
            _ => Payload::Legacy {
                to: file.to,
                value: file.value,
                data: file.data,
            },
        };
        Self {
            tx_type: file.tx_type,
            payload,
            nonce_key: file.nonce_key,
            fee_token: file.fee_token,
            from: file.from,
            gas: file.gas,
            gas_price: file.gas_price,
            max_fee_per_gas: file.max_fee_per_gas,
            max_priority_fee_per_gas: file.max_priority_fee_per_gas,
            nonce: file.nonce,
            chain_id: file.chain_id,
        }
    }
}

impl From<Transaction> for TransactionFile {
    fn from(tx: Transaction) -> Self {
        let mut file = TransactionFile {
            tx_type: tx.tx_type,
            nonce_key: tx.nonce_key,
            fee_token: tx.fee_token,
            from: tx.from,
            gas: tx.gas,
            gas_price: tx.gas_price,
            max_fee_per_gas: tx.max_fee_per_gas,
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
            nonce: tx.nonce,
            chain_id: tx.chain_id,
            ..Default::default()
        };
        match tx.payload {
            Payload::Batched(calls) => file.calls = Some(calls),
            Payload::Legacy { to, value, data } => {
                file.to = to;
                file.value = value;
                file.data = data;
            }
        }
        file
    }
}

/// `Option<U256>` as a decimal string. Reading also accepts `0x` hex strings
/// and plain JSON integers.
mod decimal {
    use std::str::FromStr;

    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&value.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(U256::from(n))),
            Some(Raw::Text(text)) if text.is_empty() => Ok(None),
            Some(Raw::Text(text)) => U256::from_str(&text)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid integer {text:?}: {e}"))),
        }
    }
}
