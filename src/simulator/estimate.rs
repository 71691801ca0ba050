use alloy::primitives::U256;
use tracing::{debug, warn};

use super::{call_request, validate};
use crate::{
    chain::ChainService,
    error::{Error, Result},
    transaction::Transaction,
};

/// Estimate gas for the transaction's first call via the chain.
///
/// Validation runs first, so a rejected transaction never reaches the chain.
pub async fn estimate_gas<C>(chain: &C, tx: &Transaction) -> Result<u64>
where
    C: ChainService + ?Sized,
{
    validate(tx)?;

    let request = call_request(tx);
    match chain.estimate_gas(&request).await {
        Ok(gas) => {
            debug!(gas, "gas estimated");
            Ok(gas)
        }
        Err(err) if err.is_native_value_rejection() => {
            warn!(%err, "chain rejected native value");
            Err(Error::NativeValueUnsupported)
        }
        Err(err) => {
            debug!(code = ?err.code(), %err, "gas estimation failed");
            Err(Error::GasEstimation(err))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostEstimate {
    /// `gas * gasPrice`.
    Exact(U256),
    /// `gas * maxFeePerGas`, an upper bound.
    Max(U256),
    /// The product does not fit in 256 bits.
    Overflow,
}

/// Cost of `gas` under the transaction's pricing, preferring the legacy
/// gas price over the fee-market cap.
pub fn estimated_cost(gas: u64, tx: &Transaction) -> Option<CostEstimate> {
    let gas = U256::from(gas);
    let estimate = if let Some(price) = tx.gas_price {
        gas.checked_mul(price).map(CostEstimate::Exact)
    } else {
        gas.checked_mul(tx.max_fee_per_gas?).map(CostEstimate::Max)
    };
    Some(estimate.unwrap_or(CostEstimate::Overflow))
}
