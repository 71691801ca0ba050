use clap::Args;
use colored::Colorize;

use super::{heading, resolve_transaction, Encoding, TransactionArgs};
use crate::{
    chain::ChainService,
    error::Result,
    prompts::Prompter,
    simulator::{estimate_gas, simulate_transaction, TransactionResult},
};

#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub transaction: TransactionArgs,
}

impl SimulateArgs {
    pub async fn run(
        &self,
        prompter: &mut dyn Prompter,
        chain: &dyn ChainService,
    ) -> Result<TransactionResult> {
        let tx = resolve_transaction(&self.transaction, prompter, Encoding::Batched)?;

        heading("Simulating Transaction...");
        println!("{}", tx.to_json_pretty()?.dimmed());

        println!("{}", "\nEstimating gas...".blue());
        let gas = estimate_gas(chain, &tx).await?;
        println!("{}", format!("Estimated gas: {gas}").green());

        println!("{}", "\nRunning simulation...".blue());
        let result = simulate_transaction(chain, &tx).await;
        match &result {
            TransactionResult::Success {
                return_data,
                gas_used,
            } => {
                println!("{}", "\nSimulation successful!\n".green());
                if let Some(data) = return_data {
                    println!("{}", format!("Return data: {data}").cyan());
                }
                if let Some(gas_used) = gas_used {
                    println!("{}", format!("Gas used: {gas_used}").cyan());
                }
            }
            TransactionResult::Failure { error } => {
                println!("{}", "\nSimulation failed!\n".red());
                println!("{}", format!("Error: {error}").red());
            }
        }
        Ok(result)
    }
}
