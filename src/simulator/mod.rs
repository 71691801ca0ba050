use alloy::primitives::Bytes;
use serde::Serialize;

use crate::{chain::CallRequest, transaction::Transaction};

mod estimate;
mod simulate;
mod validate;

pub use estimate::{estimate_gas, estimated_cost, CostEstimate};
pub use simulate::simulate_transaction;
pub use validate::{validate, ValidationError};

/// Outcome of a simulated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TransactionResult {
    #[serde(rename_all = "camelCase")]
    Success {
        return_data: Option<Bytes>,
        gas_used: Option<u64>,
    },
    Failure { error: String },
}

impl TransactionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        TransactionResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::Success { .. })
    }
}

/// Request parameters shared by estimation and simulation: the first call
/// (or the legacy fields), acting as `from` when it is set.
pub fn call_request(tx: &Transaction) -> CallRequest {
    let target = tx.call_target();
    CallRequest {
        to: target.to,
        data: target.data,
        value: target.value,
        account: tx.from,
    }
}
