use colored::Colorize;

use super::{
    build::BuildArgs, estimate::EstimateArgs, flow::FlowArgs, simulate::SimulateArgs, Command,
};
use crate::{chain::ChainService, error::Result, prompts::Prompter};

const ACTIONS: [&str; 5] = [
    "Build Transaction - Create a new transaction interactively",
    "Simulate Transaction - Test a transaction before execution",
    "Estimate Gas - Get gas estimate for a transaction",
    "Multi-Step Flow - Build complex transaction sequences",
    "Exit",
];

/// Interactive loop used when no subcommand is given.
pub async fn main_menu(prompter: &mut dyn Prompter, chain: &dyn ChainService) -> Result<()> {
    println!(
        "{}",
        "\n=== Transaction Builder & Simulator ===\n".blue()
    );
    let actions: Vec<String> = ACTIONS.iter().map(|a| a.to_string()).collect();

    loop {
        let command = match prompter.select("What would you like to do?", &actions)? {
            0 => Command::Build(BuildArgs::default()),
            1 => Command::Simulate(SimulateArgs::default()),
            2 => Command::Estimate(EstimateArgs::default()),
            3 => Command::Flow(FlowArgs::default()),
            _ => break,
        };
        command.run(prompter, chain).await?;

        if !prompter.confirm("Would you like to do something else?", true)? {
            break;
        }
    }

    println!("{}", "\nGoodbye!\n".dimmed());
    Ok(())
}
