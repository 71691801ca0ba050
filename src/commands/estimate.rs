use clap::Args;
use colored::Colorize;

use super::{heading, resolve_transaction, Encoding, TransactionArgs};
use crate::{
    chain::ChainService,
    error::{Error, Result},
    prompts::Prompter,
    simulator::{estimate_gas, estimated_cost, CostEstimate},
};

#[derive(Args, Debug, Clone, Default)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub transaction: TransactionArgs,
}

impl EstimateArgs {
    pub async fn run(&self, prompter: &mut dyn Prompter, chain: &dyn ChainService) -> Result<u64> {
        let tx = resolve_transaction(&self.transaction, prompter, Encoding::Legacy)?;
        if tx.from.is_none() {
            return Err(Error::MissingFrom);
        }

        heading("Estimating Gas...");
        let gas = estimate_gas(chain, &tx).await?;
        println!("{}", format!("Estimated gas: {gas}").green());
        println!("{}", format!("Estimated gas (hex): {gas:#x}").cyan());

        match estimated_cost(gas, &tx) {
            Some(CostEstimate::Exact(cost)) => {
                println!("{}", format!("Estimated cost: {cost} wei").cyan())
            }
            Some(CostEstimate::Max(cost)) => {
                println!("{}", format!("Estimated cost (max): {cost} wei").cyan())
            }
            Some(CostEstimate::Overflow) => {
                println!("{}", "Estimated cost overflows 256 bits".yellow())
            }
            None => {}
        }
        Ok(gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::{CallRequest, MockChain},
        prompts::testing::ScriptedPrompter,
        transaction::Transaction,
    };
    use alloy::primitives::{address, Address, U256};

    const FROM: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[tokio::test]
    async fn test_estimate_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        let to = address!("0x1234567890123456789012345678901234567890");
        Transaction {
            gas_price: Some(U256::from(20_000_000_000u64)),
            ..Transaction::legacy(Some(FROM), Some(to), Some(U256::from(1)), None)
        }
        .save(&path)
        .unwrap();

        let mut chain = MockChain::new();
        chain
            .expect_estimate_gas()
            .withf(move |request: &CallRequest| {
                request.to == Some(to) && request.account == Some(FROM)
            })
            .times(1)
            .returning(|_| Ok(21_000));

        let args = EstimateArgs {
            transaction: TransactionArgs {
                file: Some(path),
                ..Default::default()
            },
        };
        let gas = args
            .run(&mut ScriptedPrompter::default(), &chain)
            .await
            .unwrap();
        assert_eq!(gas, 21_000);
    }

    #[tokio::test]
    async fn test_sender_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        Transaction::legacy(None, Some(FROM), None, None)
            .save(&path)
            .unwrap();

        let mut chain = MockChain::new();
        chain.expect_estimate_gas().never();

        let args = EstimateArgs {
            transaction: TransactionArgs {
                file: Some(path),
                ..Default::default()
            },
        };
        let err = args
            .run(&mut ScriptedPrompter::default(), &chain)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFrom));
    }
}
