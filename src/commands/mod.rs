use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, U256};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::{
    builder::prompt_token_transfer,
    chain::ChainService,
    error::Result,
    prompts::Prompter,
    transaction::{Call, Transaction},
};

pub mod build;
pub mod estimate;
pub mod flow;
pub mod menu;
pub mod simulate;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a transaction interactively
    Build(build::BuildArgs),
    /// Simulate a transaction before execution
    Simulate(simulate::SimulateArgs),
    /// Estimate gas for a transaction
    Estimate(estimate::EstimateArgs),
    /// Build and simulate multi-step transaction flows
    Flow(flow::FlowArgs),
}

impl Command {
    pub async fn run(&self, prompter: &mut dyn Prompter, chain: &dyn ChainService) -> Result<()> {
        match self {
            Command::Build(args) => args.run(prompter, chain).await.map(|_| ()),
            Command::Simulate(args) => args.run(prompter, chain).await.map(|_| ()),
            Command::Estimate(args) => args.run(prompter, chain).await.map(|_| ()),
            Command::Flow(args) => args.run(prompter, chain).await.map(|_| ()),
        }
    }
}

/// Where `simulate` and `estimate` take their transaction from.
#[derive(Args, Debug, Clone, Default)]
pub struct TransactionArgs {
    /// Load transaction from file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// From address
    #[arg(short, long)]
    pub address: Option<Address>,
    /// To address
    #[arg(short, long)]
    pub to: Option<Address>,
    /// Transaction data
    #[arg(short, long)]
    pub data: Option<Bytes>,
    /// Value in wei
    #[arg(short, long)]
    pub value: Option<U256>,
}

impl TransactionArgs {
    /// The transaction named by flags, if any. A file wins over the
    /// individual fields, which require `--address`.
    pub fn load(&self) -> Result<Option<Transaction>> {
        if let Some(path) = &self.file {
            return Transaction::load(path).map(Some);
        }
        Ok(self.address.map(|from| {
            Transaction::legacy(Some(from), self.to, self.value, self.data.clone())
        }))
    }
}

/// Shape of transactions entered interactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Batched,
    Legacy,
}

const SOURCES: [&str; 3] = ["File", "TIP-20 Token Transfer", "Enter manually"];

/// Ask where the transaction comes from and read it.
pub fn prompt_transaction(prompter: &mut dyn Prompter, encoding: Encoding) -> Result<Transaction> {
    let sources: Vec<String> = SOURCES.iter().map(|s| s.to_string()).collect();
    match prompter.select("Load transaction from:", &sources)? {
        0 => {
            let path = prompter.existing_file("Transaction file path:")?;
            Transaction::load(&path)
        }
        1 => {
            let from = prompter.address("From address:")?;
            let transfer = prompt_token_transfer(prompter)?;
            Ok(match encoding {
                Encoding::Batched => Transaction::batched(Some(from), vec![transfer.call()]),
                Encoding::Legacy => Transaction::legacy(
                    Some(from),
                    Some(transfer.token.address),
                    Some(U256::ZERO),
                    Some(transfer.calldata),
                ),
            })
        }
        _ => {
            let from = prompter.address("From address:")?;
            let to = if prompter.confirm("Does this transaction have a recipient?", false)? {
                Some(prompter.address("To address:")?)
            } else {
                None
            };
            let data = if prompter.confirm("Does this transaction include calldata?", false)? {
                Some(prompter.hex("Calldata (hex):")?)
            } else {
                None
            };
            let value = if prompter.confirm("Does this transaction send value?", false)? {
                prompter.uint("Value (in wei):", true)?
            } else {
                None
            };
            Ok(match encoding {
                Encoding::Batched => Transaction::batched(
                    Some(from),
                    vec![Call {
                        to,
                        value,
                        input: data,
                    }],
                ),
                Encoding::Legacy => Transaction::legacy(Some(from), to, value, data),
            })
        }
    }
}

/// The transaction from flags, or else from interactive prompts.
pub fn resolve_transaction(
    args: &TransactionArgs,
    prompter: &mut dyn Prompter,
    encoding: Encoding,
) -> Result<Transaction> {
    match args.load()? {
        Some(tx) => Ok(tx),
        None => prompt_transaction(prompter, encoding),
    }
}

pub(crate) fn print_json(tx: &Transaction) -> Result<()> {
    println!("{}", tx.to_json_pretty()?);
    Ok(())
}

pub(crate) fn heading(text: &str) {
    println!("{}", format!("\n{text}\n").blue());
}
