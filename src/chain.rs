use alloy::{
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// Substring the node puts in its error when it refuses native value.
///
/// The node exposes no dedicated error code for this, so classification
/// depends on its message wording.
const NATIVE_VALUE_REJECTION: &str = "value transfer not allowed";

/// Parameters of an `eth_call` or `eth_estimateGas` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
    pub account: Option<Address>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("{message}")]
    Rpc { code: i64, message: String },
    #[error("{0}")]
    Transport(String),
}

impl ChainError {
    pub fn message(&self) -> &str {
        match self {
            ChainError::Rpc { message, .. } => message,
            ChainError::Transport(message) => message,
        }
    }

    /// JSON-RPC error code, when the node answered with one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ChainError::Rpc { code, .. } => Some(*code),
            ChainError::Transport(_) => None,
        }
    }

    /// Whether the chain refused the request because it carries native value.
    pub fn is_native_value_rejection(&self) -> bool {
        self.message().contains(NATIVE_VALUE_REJECTION)
    }
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => ChainError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            None => ChainError::Transport(err.to_string()),
        }
    }
}

/// The read-only chain operations this tool relies on.
#[async_trait]
pub trait ChainService: Send + Sync {
    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError>;

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainError>;
}

impl From<&CallRequest> for TransactionRequest {
    fn from(request: &CallRequest) -> Self {
        let mut tx = TransactionRequest::default();
        if let Some(to) = request.to {
            tx = tx.to(to);
        }
        if let Some(data) = &request.data {
            tx = tx.input(data.clone().into());
        }
        if let Some(value) = request.value {
            tx = tx.value(value);
        }
        if let Some(account) = request.account {
            tx = tx.from(account);
        }
        tx
    }
}

/// Chain service backed by a JSON-RPC node.
pub struct RpcChain {
    provider: DynProvider,
}

impl RpcChain {
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(Error::TransportError)?;
        debug!(rpc_url, "connected provider");

        Ok(Self {
            provider: provider.erased(),
        })
    }
}

#[async_trait]
impl ChainService for RpcChain {
    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        debug!(?request, "eth_call");
        Ok(self.provider.call(request.into()).await?)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        debug!(?request, "eth_estimateGas");
        Ok(self.provider.estimate_gas(request.into()).await?)
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        debug!(%address, "eth_getTransactionCount");
        Ok(self.provider.get_transaction_count(address).await?)
    }
}

#[cfg(test)]
mockall::mock! {
    pub Chain {}

    #[async_trait]
    impl ChainService for Chain {
        async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;
        async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError>;
        async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, bytes, TxKind};

    #[test]
    fn test_native_value_rejection_is_classified() {
        let err = ChainError::Rpc {
            code: -32000,
            message: "execution failed: value transfer not allowed".to_string(),
        };
        assert!(err.is_native_value_rejection());

        let err = ChainError::Transport("connection refused".to_string());
        assert!(!err.is_native_value_rejection());
    }

    #[test]
    fn test_rpc_error_display_is_node_message() {
        let err = ChainError::Rpc {
            code: 3,
            message: "execution reverted".to_string(),
        };
        assert_eq!(err.to_string(), "execution reverted");
        assert_eq!(err.message(), "execution reverted");
        assert_eq!(err.code(), Some(3));
        assert_eq!(ChainError::Transport("eof".to_string()).code(), None);
    }

    #[test]
    fn test_request_conversion() {
        let request = CallRequest {
            to: Some(address!("0x20c0000000000000000000000000000000000001")),
            data: Some(bytes!("a9059cbb")),
            value: Some(U256::ZERO),
            account: Some(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
        };
        let tx: TransactionRequest = (&request).into();

        assert_eq!(tx.to, request.to.map(TxKind::Call));
        assert_eq!(tx.from, request.account);
        assert_eq!(tx.value, request.value);
        assert_eq!(tx.input.input().cloned(), request.data);
    }

    #[test]
    fn test_creation_request_has_no_target() {
        let tx: TransactionRequest = (&CallRequest::default()).into();
        assert_eq!(tx.to, None);
        assert_eq!(tx.from, None);
    }
}
