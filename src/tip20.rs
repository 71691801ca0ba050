use alloy::{
    primitives::{address, Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

use crate::error::{Error, Result};

sol! {
    interface ITIP20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// A known TIP-20 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub name: &'static str,
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

pub const TIP20_TOKENS: [Token; 3] = [
    Token {
        name: "AlphaUSD",
        symbol: "AUSD",
        address: address!("0x20c0000000000000000000000000000000000001"),
        decimals: 6,
    },
    Token {
        name: "BetaUSD",
        symbol: "BUSD",
        address: address!("0x20c0000000000000000000000000000000000002"),
        decimals: 6,
    },
    Token {
        name: "ThetaUSD",
        symbol: "TUSD",
        address: address!("0x20c0000000000000000000000000000000000003"),
        decimals: 6,
    },
];

/// Look a token up by its registry key (the token name).
pub fn token(key: &str) -> Result<&'static Token> {
    TIP20_TOKENS
        .iter()
        .find(|token| token.name == key)
        .ok_or_else(|| Error::UnknownToken(key.to_string()))
}

/// Calldata for `transfer(to, amount)` on a TIP-20 token contract.
pub fn encode_transfer_calldata(to: Address, amount: U256) -> Bytes {
    Bytes::from(ITIP20::transferCall { to, amount }.abi_encode())
}

impl Token {
    /// Menu label, e.g. `AlphaUSD (AUSD) - 0x20c0...0001`.
    pub fn label(&self) -> String {
        format!("{} ({}) - {}", self.name, self.symbol, self.address)
    }
}
