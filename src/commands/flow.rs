use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use tracing::warn;

use super::heading;
use crate::{
    builder::{build_transaction, BuildOptions},
    chain::ChainService,
    error::Result,
    flow::{run_flow, Flow, StepOutcome, StepReport},
    prompts::Prompter,
    simulator::TransactionResult,
};

/// Return data is shown up to this many bytes.
const RETURN_DATA_PREVIEW: usize = 32;

#[derive(Args, Debug, Clone, Default)]
pub struct FlowArgs {
    /// Load flow from file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Execute the flow after building
    #[arg(short, long)]
    pub execute: bool,
}

impl FlowArgs {
    pub async fn run(
        &self,
        prompter: &mut dyn Prompter,
        chain: &dyn ChainService,
    ) -> Result<Vec<StepReport>> {
        let mut flow = match &self.file {
            Some(path) => Flow::load(path)?,
            None => prompt_flow(prompter, chain).await?,
        };

        print_summary(&flow);

        heading("Simulating Flow Steps...");
        let reports = run_flow(chain, &mut flow).await;
        for report in &reports {
            print_report(report);
        }
        let succeeded = reports
            .iter()
            .filter(|report| matches!(&report.outcome, StepOutcome::Simulated(r) if r.is_success()))
            .count();
        println!(
            "{}",
            format!("\n{succeeded}/{} steps simulated successfully", reports.len()).cyan()
        );

        if self.execute {
            println!("{}", "\nExecution not yet implemented".yellow());
            println!(
                "{}",
                "Use the explorer or a wallet to execute these transactions".dimmed()
            );
        }
        Ok(reports)
    }
}

async fn prompt_flow(prompter: &mut dyn Prompter, chain: &dyn ChainService) -> Result<Flow> {
    heading("Building Multi-Step Transaction Flow");

    let name = prompter.text("Flow name:", Some("My Transaction Flow"))?;
    let description = prompter.text("Flow description (optional):", None)?;
    let mut flow = Flow::new(name, (!description.is_empty()).then_some(description));

    loop {
        let number = flow.steps.len() + 1;
        heading(&format!("Step {number}"));

        let step_name = prompter.text("Step name:", Some(&format!("Step {number}")))?;
        let transaction = build_transaction(prompter, chain, BuildOptions::default()).await?;

        let mut dependencies = Vec::new();
        if !flow.steps.is_empty()
            && prompter.confirm("Does this step depend on previous steps?", false)?
        {
            let names: Vec<String> = flow.steps.iter().map(|step| step.name.clone()).collect();
            dependencies = prompter
                .multi_select("Select dependent steps:", &names)?
                .into_iter()
                .filter_map(|index| flow.steps.get(index).map(|step| step.id.clone()))
                .collect();
        }
        flow.push_step(step_name, transaction, dependencies);

        if !prompter.confirm("Add another step?", false)? {
            break;
        }
    }

    if prompter.confirm("Save flow to file?", false)? {
        let filename = prompter.text("Filename:", Some("flow.json"))?;
        flow.save(Path::new(&filename))?;
        println!("{}", format!("\nFlow saved to {filename}").green());
    }
    Ok(flow)
}

fn print_summary(flow: &Flow) {
    heading("Flow Summary:");
    println!("{}", format!("Name: {}", flow.name).cyan());
    if let Some(description) = &flow.description {
        println!("{}", format!("Description: {description}").dimmed());
    }
    println!("{}", format!("Steps: {}\n", flow.steps.len()).cyan());

    for (index, step) in flow.steps.iter().enumerate() {
        println!(
            "{}",
            format!("{}. {} ({})", index + 1, step.name, step.id).yellow()
        );
        if !step.dependencies.is_empty() {
            println!(
                "{}",
                format!("   Depends on: {}", step.dependencies.join(", ")).dimmed()
            );
        }
    }

    for (step, dependency) in flow.unknown_dependencies() {
        warn!(step, dependency, "dependency names no step in this flow");
        println!(
            "{}",
            format!("Warning: {step} depends on unknown step {dependency}").yellow()
        );
    }
    println!(
        "{}",
        "Dependencies are informational: steps run in the order listed.".dimmed()
    );
}

fn print_report(report: &StepReport) {
    heading(&report.name);
    if let Some(gas) = report.gas_estimate {
        println!("{}", format!("Estimated gas: {gas}").green());
    }
    match &report.outcome {
        StepOutcome::Simulated(TransactionResult::Success { return_data, .. }) => {
            println!("{}", "Simulation successful".green());
            if let Some(data) = return_data {
                let shown = &data[..data.len().min(RETURN_DATA_PREVIEW)];
                println!(
                    "{}",
                    format!("   Return data: 0x{}...", hex::encode(shown)).dimmed()
                );
            }
        }
        StepOutcome::Simulated(TransactionResult::Failure { error }) => {
            println!("{}", "Simulation failed".red());
            println!("{}", format!("   Error: {error}").red());
        }
        StepOutcome::EstimationFailed(error) => {
            println!("{}", format!("Error: {error}").red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::MockChain,
        prompts::testing::{Answer, ScriptedPrompter},
    };
    use alloy::primitives::{address, Address, Bytes};

    const FROM: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn step_answers(name: &str) -> Vec<Answer> {
        vec![
            Answer::Text(name.to_string()),
            Answer::Address(FROM),
            Answer::Select(2),
            Answer::Confirm(false),
            Answer::Confirm(false),
            Answer::Confirm(false), // custom nonce
            Answer::Confirm(false),
            Answer::Confirm(false),
        ]
    }

    #[tokio::test]
    async fn test_interactive_flow_is_saved_and_simulated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");

        let mut answers = vec![
            Answer::Text("payroll".to_string()),
            Answer::Text(String::new()),
        ];
        answers.extend(step_answers("fund"));
        answers.push(Answer::Confirm(true)); // add another
        answers.extend(step_answers("pay"));
        answers.push(Answer::Confirm(true)); // depends on previous
        answers.push(Answer::MultiSelect(vec![0]));
        answers.push(Answer::Confirm(false)); // add another
        answers.push(Answer::Confirm(true)); // save
        answers.push(Answer::Text(path.display().to_string()));
        let mut prompter = ScriptedPrompter::new(answers);

        let mut chain = MockChain::new();
        chain.expect_get_transaction_count().returning(|_| Ok(1));
        chain.expect_estimate_gas().times(2).returning(|_| Ok(21_000));
        chain.expect_call().times(2).returning(|_| Ok(Bytes::new()));

        let reports = FlowArgs::default().run(&mut prompter, &chain).await.unwrap();
        assert!(prompter.is_exhausted());
        assert_eq!(reports.len(), 2);

        let saved = Flow::load(&path).unwrap();
        assert_eq!(saved.name, "payroll");
        assert_eq!(saved.description, None);
        assert_eq!(saved.steps[1].id, "step-2");
        assert_eq!(saved.steps[1].dependencies, vec!["step-1".to_string()]);
        assert_eq!(saved.steps[0].transaction.nonce, Some(1));
    }

    #[tokio::test]
    async fn test_flow_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");
        let mut flow = Flow::new("from disk", Some("one step".to_string()));
        flow.push_step(
            "read",
            crate::transaction::Transaction::legacy(None, Some(FROM), None, None),
            vec!["step-7".to_string()],
        );
        flow.save(&path).unwrap();

        let mut chain = MockChain::new();
        chain.expect_estimate_gas().never();
        chain.expect_call().times(1).returning(|_| Ok(Bytes::new()));

        let args = FlowArgs {
            file: Some(path),
            execute: true,
        };
        let reports = args
            .run(&mut ScriptedPrompter::default(), &chain)
            .await
            .unwrap();
        assert_eq!(reports[0].id, "step-1");
    }
}
