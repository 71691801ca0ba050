use clap::Args;

use crate::{chain::RpcChain, error::Result};

pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.tempo.xyz";

/// Connection settings, read from flags, the environment, or `.env`.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the chain
    #[arg(long, global = true, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,
}

impl Config {
    pub async fn connect(&self) -> Result<RpcChain> {
        RpcChain::connect(&self.rpc_url).await
    }
}
