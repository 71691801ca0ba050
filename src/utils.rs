use std::{fs, path::Path};

use alloy::primitives::U256;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Convert a decimal amount such as `"100.5"` into the token's smallest unit.
///
/// Fraction digits beyond `decimals` are truncated, never rounded.
pub fn calculate_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let whole = if whole.is_empty() { "0" } else { whole };

    let width = decimals as usize;
    let mut digits = String::with_capacity(whole.len() + width);
    digits.push_str(whole);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(width));

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    U256::from_str_radix(&digits, 10).map_err(|_| Error::InvalidAmount(amount.to_string()))
}

/// Whether `input` is a plain decimal number: digits with an optional fraction.
pub fn is_valid_amount(input: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match input.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(input),
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
