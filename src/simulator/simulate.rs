use tracing::{debug, warn};

use super::{call_request, validate, TransactionResult};
use crate::{chain::ChainService, error::NATIVE_VALUE_UNSUPPORTED, transaction::Transaction};

/// Preview the transaction's first call with a read-only `eth_call`.
///
/// Every failure, including a rejected transaction, is reported as
/// [`TransactionResult::Failure`].
pub async fn simulate_transaction<C>(chain: &C, tx: &Transaction) -> TransactionResult
where
    C: ChainService + ?Sized,
{
    if let Err(err) = validate(tx) {
        return TransactionResult::failure(err.to_string());
    }

    let request = call_request(tx);
    match chain.call(&request).await {
        Ok(data) => {
            debug!(len = data.len(), "call succeeded");
            TransactionResult::Success {
                return_data: (!data.is_empty()).then_some(data),
                gas_used: None,
            }
        }
        Err(err) if err.is_native_value_rejection() => {
            warn!(%err, "chain rejected native value");
            TransactionResult::failure(NATIVE_VALUE_UNSUPPORTED)
        }
        Err(err) => {
            debug!(code = ?err.code(), %err, "call failed");
            TransactionResult::failure(err.message())
        }
    }
}
