use std::path::PathBuf;

use alloy::primitives::U256;
use clap::Args;
use colored::Colorize;

use super::{heading, print_json};
use crate::{
    builder::{build_transaction, BuildOptions},
    chain::ChainService,
    error::Result,
    prompts::Prompter,
    simulator::estimate_gas,
    transaction::Transaction,
};

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Save transaction to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Set nonce manually
    #[arg(short, long)]
    pub nonce: Option<u64>,
}

impl BuildArgs {
    pub async fn run(&self, prompter: &mut dyn Prompter, chain: &dyn ChainService) -> Result<Transaction> {
        let options = BuildOptions {
            from: None,
            nonce: self.nonce,
        };
        let mut tx = build_transaction(prompter, chain, options).await?;

        if tx.gas.is_none() && tx.from.is_some() {
            println!("{}", "\nEstimating gas...".blue());
            match estimate_gas(chain, &tx).await {
                Ok(gas) => {
                    tx.gas = Some(U256::from(gas));
                    println!("{}", format!("Estimated gas: {gas}").green());
                }
                Err(err) => println!("{}", format!("Could not estimate gas: {err}").yellow()),
            }
        }

        heading("Transaction Summary:");
        print_json(&tx)?;
        let sequence = if tx.nonce_key().is_zero() {
            "protocol nonce"
        } else {
            "user nonce"
        };
        println!(
            "{}",
            format!(
                "\n{} call(s), nonce key {} ({sequence})",
                tx.calls().len(),
                tx.nonce_key()
            )
            .dimmed()
        );

        if let Some(path) = &self.output {
            tx.save(path)?;
            println!(
                "{}",
                format!("\nTransaction saved to {}", path.display()).green()
            );
        }
        Ok(tx)
    }
}
