use std::{path::PathBuf, str::FromStr};

use alloy::primitives::{Address, Bytes, U256};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::{
    error::{Error, Result},
    utils::is_valid_amount,
};

/// Source of interactive answers.
pub trait Prompter {
    fn address(&mut self, message: &str) -> Result<Address>;

    /// `0x`-prefixed hex bytes.
    fn hex(&mut self, message: &str) -> Result<Bytes>;

    /// Unsigned integer; `None` when an optional answer is left empty.
    fn uint(&mut self, message: &str, required: bool) -> Result<Option<U256>>;

    fn number(&mut self, message: &str, required: bool) -> Result<Option<u64>>;

    /// Decimal token amount such as `100` or `100.5`.
    fn amount(&mut self, message: &str) -> Result<String>;

    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    fn existing_file(&mut self, message: &str) -> Result<PathBuf>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Index of the chosen item.
    fn select(&mut self, message: &str, items: &[String]) -> Result<usize>;

    fn multi_select(&mut self, message: &str, items: &[String]) -> Result<Vec<usize>>;
}

pub fn parse_address(input: &str) -> Result<Address, String> {
    Address::from_str(input.trim())
        .map_err(|_| "Invalid address format. Must be a valid Ethereum address.".to_string())
}

pub fn parse_hex(input: &str) -> Result<Bytes, String> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| "Must start with 0x".to_string())?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("Invalid hex string".to_string());
    }
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|_| "Hex string must have an even number of digits".to_string())
}

pub fn parse_uint(input: &str) -> Result<U256, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Invalid number format".to_string());
    }
    U256::from_str(input).map_err(|_| "Invalid number format".to_string())
}

pub fn parse_number(input: &str) -> Result<u64, String> {
    input
        .trim()
        .parse()
        .map_err(|_| "Invalid number format".to_string())
}

/// Accepts an empty answer when the field is optional.
fn check<T>(input: &str, required: bool, parse: fn(&str) -> Result<T, String>) -> Result<(), String> {
    if !required && input.trim().is_empty() {
        return Ok(());
    }
    parse(input).map(|_| ()).map_err(|msg| msg.red().to_string())
}

/// `None` for a blank answer, otherwise the parsed value.
fn optional<T>(input: &str, parse: fn(&str) -> Result<T, String>) -> Result<Option<T>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse(input).map(Some).map_err(Error::InvalidInput)
}

/// Prompts on the terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn input(
        &self,
        message: &str,
        required: bool,
        validate: fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(!required)
            .validate_with(move |input: &String| validate(input))
            .interact_text()?;
        Ok(answer)
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn address(&mut self, message: &str) -> Result<Address> {
        let answer = self.input(message, true, |input| check(input, true, parse_address))?;
        parse_address(&answer).map_err(Error::InvalidInput)
    }

    fn hex(&mut self, message: &str) -> Result<Bytes> {
        let answer = self.input(message, true, |input| check(input, true, parse_hex))?;
        parse_hex(&answer).map_err(Error::InvalidInput)
    }

    fn uint(&mut self, message: &str, required: bool) -> Result<Option<U256>> {
        let answer = if required {
            self.input(message, true, |input| check(input, true, parse_uint))?
        } else {
            self.input(message, false, |input| check(input, false, parse_uint))?
        };
        optional(&answer, parse_uint)
    }

    fn number(&mut self, message: &str, required: bool) -> Result<Option<u64>> {
        let answer = if required {
            self.input(message, true, |input| check(input, true, parse_number))?
        } else {
            self.input(message, false, |input| check(input, false, parse_number))?
        };
        optional(&answer, parse_number)
    }

    fn amount(&mut self, message: &str) -> Result<String> {
        self.input(message, true, |input| {
            if input.trim().is_empty() {
                Err("Amount is required".red().to_string())
            } else if !is_valid_amount(input) {
                Err("Invalid number format".red().to_string())
            } else {
                Ok(())
            }
        })
    }

    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn existing_file(&mut self, message: &str) -> Result<PathBuf> {
        let answer = self.input(message, true, |input| {
            if PathBuf::from(input).is_file() {
                Ok(())
            } else {
                Err("File does not exist".red().to_string())
            }
        })?;
        Ok(PathBuf::from(answer))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact()?)
    }

    fn select(&mut self, message: &str, items: &[String]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn multi_select(&mut self, message: &str, items: &[String]) -> Result<Vec<usize>> {
        Ok(MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .interact()?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, bytes};

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("0x1234567890123456789012345678901234567890"),
            Ok(address!("0x1234567890123456789012345678901234567890"))
        );
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("not an address").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0xa9059cbb"), Ok(bytes!("a9059cbb")));
        assert_eq!(parse_hex("0x"), Ok(Bytes::new()));
        assert_eq!(parse_hex("a9059cbb"), Err("Must start with 0x".to_string()));
        assert_eq!(parse_hex("0xzz"), Err("Invalid hex string".to_string()));
        assert!(parse_hex("0xabc").is_err());
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_uint("1000000000000000000"), Ok(U256::from(10u64.pow(18))));
        assert_eq!(parse_uint("0x10"), Ok(U256::from(16)));
        assert!(parse_uint("1.5").is_err());
        assert_eq!(parse_number("7"), Ok(7));
        assert!(parse_number("-1").is_err());
    }

    #[test]
    fn test_optional_fields_accept_empty_answers() {
        assert!(check("", false, parse_uint).is_ok());
        assert!(check("", true, parse_uint).is_err());
        assert!(check("12", true, parse_uint).is_ok());
        assert!(check("  ", false, parse_number).is_ok());
    }

    #[test]
    fn test_blank_integers_are_rejected() {
        assert!(parse_uint("").is_err());
        assert!(parse_uint("   ").is_err());
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_optional_answers() {
        assert_eq!(optional("", parse_uint).unwrap(), None);
        assert_eq!(optional(" ", parse_number).unwrap(), None);
        assert_eq!(optional("0", parse_uint).unwrap(), Some(U256::ZERO));
        assert_eq!(optional("42", parse_number).unwrap(), Some(42));
        assert!(matches!(
            optional("4x", parse_uint),
            Err(Error::InvalidInput(_))
        ));
    }
}
