use std::path::PathBuf;

use alloy::transports::TransportError;

use crate::{chain::ChainError, simulator::ValidationError};

/// Message shown whenever the chain refuses a native value transfer.
pub const NATIVE_VALUE_UNSUPPORTED: &str =
    "native value transfers are not supported: use token transfers instead of native value transfers";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("gas estimation failed: {0}")]
    InvalidTransaction(#[from] ValidationError),
    #[error("{}", NATIVE_VALUE_UNSUPPORTED)]
    NativeValueUnsupported,
    #[error("gas estimation failed: {0}")]
    GasEstimation(ChainError),
    #[error("from address is required for gas estimation")]
    MissingFrom,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid token amount {0:?}")]
    InvalidAmount(String),
    #[error("unknown token {0:?}")]
    UnknownToken(String),
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Alloy Transport Error: {0}")]
    TransportError(TransportError),
}
