use alloy::primitives::{Address, Bytes, U256};
use colored::Colorize;
use tracing::warn;

use crate::{
    chain::ChainService,
    error::Result,
    prompts::Prompter,
    tip20::{self, encode_transfer_calldata, Token, TIP20_TOKENS},
    transaction::{Call, Transaction},
    utils::calculate_token_amount,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxKind {
    TokenTransfer,
    ContractCall,
    Other,
}

const TX_KINDS: [(TxKind, &str); 3] = [
    (TxKind::TokenTransfer, "TIP-20 Token Transfer"),
    (TxKind::ContractCall, "Contract Call (with calldata)"),
    (TxKind::Other, "Other / Custom"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub from: Option<Address>,
    /// Skips the nonce lookup and prompt.
    pub nonce: Option<u64>,
}

/// A filled-in token transfer template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token: Token,
    pub recipient: Address,
    pub amount: U256,
    pub calldata: Bytes,
}

impl TokenTransfer {
    /// The transfer as a call on the token contract, carrying no native value.
    pub fn call(&self) -> Call {
        Call {
            to: Some(self.token.address),
            value: Some(U256::ZERO),
            input: Some(self.calldata.clone()),
        }
    }
}

/// Ask for a token, recipient and amount and encode the transfer.
pub fn prompt_token_transfer(prompter: &mut dyn Prompter) -> Result<TokenTransfer> {
    println!("{}", "\nTIP-20 Token Transfer\n".blue());
    println!(
        "{}",
        "Note: this chain uses TIP-20 tokens instead of native value transfers.\n".dimmed()
    );

    let labels: Vec<String> = TIP20_TOKENS.iter().map(Token::label).collect();
    let choice = prompter.select("Select token:", &labels)?;
    let token = *tip20::token(TIP20_TOKENS[choice].name)?;
    let recipient = prompter.address("Recipient address:")?;
    let amount_input = prompter.amount(&format!(
        "Amount (in {}, e.g., 100 or 100.5):",
        token.symbol
    ))?;
    let amount = calculate_token_amount(&amount_input, token.decimals)?;
    let transfer = TokenTransfer {
        token,
        recipient,
        amount,
        calldata: encode_transfer_calldata(recipient, amount),
    };

    println!(
        "{}",
        format!(
            "\nGenerated transfer calldata for {} {} ({} base units) to {}",
            amount_input, token.symbol, transfer.amount, transfer.recipient
        )
        .green()
    );
    println!("{}", format!("Token contract: {}", token.address).dimmed());
    println!("{}", format!("Calldata: {}", transfer.calldata).dimmed());

    Ok(transfer)
}

/// Build a batched transaction field by field.
pub async fn build_transaction<C>(
    prompter: &mut dyn Prompter,
    chain: &C,
    options: BuildOptions,
) -> Result<Transaction>
where
    C: ChainService + ?Sized,
{
    println!("{}", "\nBuilding Transaction\n".blue());

    let from = match options.from {
        Some(from) => {
            println!("{}", format!("From: {from}").dimmed());
            from
        }
        None => prompter.address("From address:")?,
    };

    let labels: Vec<String> = TX_KINDS.iter().map(|(_, label)| label.to_string()).collect();
    let kind = TX_KINDS[prompter.select("Transaction type:", &labels)?].0;

    let call = match kind {
        TxKind::TokenTransfer => prompt_token_transfer(prompter)?.call(),
        TxKind::ContractCall | TxKind::Other => prompt_call(prompter, kind)?,
    };

    let mut tx = Transaction::batched(Some(from), vec![call]);
    tx.nonce = match options.nonce {
        Some(nonce) => Some(nonce),
        None => prompt_nonce(prompter, chain, from).await?,
    };

    if prompter.confirm(
        "Use custom nonce key? (0 = protocol nonce, >0 = user nonce)",
        false,
    )? {
        if let Some(nonce_key) = prompter.uint("Nonce key:", true)? {
            tx.nonce_key = Some(nonce_key);
        }
    }

    if prompter.confirm("Customize gas settings?", false)? {
        tx.max_fee_per_gas = prompter.uint("Max fee per gas (wei):", true)?;
        tx.max_priority_fee_per_gas = prompter.uint("Max priority fee per gas (wei):", true)?;
        tx.gas = prompter.uint("Gas limit:", true)?;
    }

    Ok(tx)
}

fn prompt_call(prompter: &mut dyn Prompter, kind: TxKind) -> Result<Call> {
    let to = if prompter.confirm("Does this transaction have a recipient?", false)? {
        Some(prompter.address("To address:")?)
    } else {
        None
    };

    let mut value = None;
    if kind == TxKind::ContractCall
        && prompter.confirm("Does this transaction send native value?", false)?
    {
        println!(
            "{}",
            "\nNote: this chain may not support native value transfers. Use TIP-20 tokens for transfers instead."
                .yellow()
        );
        match prompter.uint("Value (in wei):", false)? {
            Some(amount) if !amount.is_zero() && to == Some(Address::ZERO) => {
                warn!("dropping native value sent to the zero address");
                println!(
                    "{}",
                    "\nWarning: sending value to the zero address is not allowed. Value will be set to 0."
                        .yellow()
                );
                value = Some(U256::ZERO);
            }
            Some(amount) if !amount.is_zero() => value = Some(amount),
            _ => {}
        }
    }

    let input = if prompter.confirm("Does this transaction include calldata?", false)? {
        Some(prompter.hex("Calldata (hex):")?)
    } else {
        None
    };

    Ok(Call { to, value, input })
}

async fn prompt_nonce<C>(
    prompter: &mut dyn Prompter,
    chain: &C,
    from: Address,
) -> Result<Option<u64>>
where
    C: ChainService + ?Sized,
{
    let current = match chain.get_transaction_count(from).await {
        Ok(nonce) => nonce,
        Err(err) => {
            warn!(%err, "nonce lookup failed");
            println!("{}", "Could not fetch nonce automatically".yellow());
            return Ok(None);
        }
    };

    println!("{}", format!("\nCurrent nonce: {current}").dimmed());
    if prompter.confirm("Use custom nonce?", false)? {
        prompter.number("Nonce:", true)
    } else {
        Ok(Some(current))
    }
}
