use alloy::primitives::Address;

use crate::transaction::Transaction;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sending value to the zero address is not allowed")]
    ZeroAddressValue,
}

/// Reject transactions where any call sends value to the zero address.
///
/// Every call of a batch is checked, not only the one that gets simulated.
pub fn validate(tx: &Transaction) -> Result<(), ValidationError> {
    let sends_to_zero = tx.value_targets().into_iter().any(|(to, value)| {
        to == Some(Address::ZERO) && value.is_some_and(|value| !value.is_zero())
    });
    if sends_to_zero {
        return Err(ValidationError::ZeroAddressValue);
    }
    Ok(())
}
