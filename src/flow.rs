//! Named sequences of transactions.
//!
//! Step dependencies are recorded and displayed but never enforced: steps
//! always run in the order they are stored.

use std::path::Path;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    chain::ChainService,
    error::Result,
    simulator::{estimate_gas, simulate_transaction, TransactionResult},
    transaction::Transaction,
    utils::{read_json, write_json},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<FlowStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub id: String,
    pub name: String,
    pub transaction: Transaction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Simulated(TransactionResult),
    /// Gas estimation failed, so the step was not simulated.
    EstimationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub id: String,
    pub name: String,
    pub gas_estimate: Option<u64>,
    pub outcome: StepOutcome,
}

impl Flow {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            steps: Vec::new(),
        }
    }

    /// Id for the next appended step: `step-1`, `step-2`, ...
    pub fn next_step_id(&self) -> String {
        format!("step-{}", self.steps.len() + 1)
    }

    pub fn push_step(
        &mut self,
        name: impl Into<String>,
        transaction: Transaction,
        dependencies: Vec<String>,
    ) -> &FlowStep {
        let id = self.next_step_id();
        self.steps.push(FlowStep {
            id,
            name: name.into(),
            transaction,
            dependencies,
        });
        &self.steps[self.steps.len() - 1]
    }

    /// `(step id, dependency)` pairs whose dependency names no step.
    pub fn unknown_dependencies(&self) -> Vec<(&str, &str)> {
        self.steps
            .iter()
            .flat_map(|step| {
                step.dependencies
                    .iter()
                    .filter(|dep| !self.steps.iter().any(|other| &other.id == *dep))
                    .map(move |dep| (step.id.as_str(), dep.as_str()))
            })
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Estimate and simulate each step in stored order.
///
/// A successful estimate is written back into the step's `gas` field. A
/// failed estimate skips that step's simulation; later steps still run.
pub async fn run_flow<C>(chain: &C, flow: &mut Flow) -> Vec<StepReport>
where
    C: ChainService + ?Sized,
{
    let mut reports = Vec::with_capacity(flow.steps.len());

    for step in &mut flow.steps {
        info!(step = %step.id, "simulating flow step");
        let mut gas_estimate = None;

        if step.transaction.from.is_some() {
            match estimate_gas(chain, &step.transaction).await {
                Ok(gas) => {
                    step.transaction.gas = Some(U256::from(gas));
                    gas_estimate = Some(gas);
                }
                Err(err) => {
                    reports.push(StepReport {
                        id: step.id.clone(),
                        name: step.name.clone(),
                        gas_estimate,
                        outcome: StepOutcome::EstimationFailed(err.to_string()),
                    });
                    continue;
                }
            }
        }

        let result = simulate_transaction(chain, &step.transaction).await;
        reports.push(StepReport {
            id: step.id.clone(),
            name: step.name.clone(),
            gas_estimate,
            outcome: StepOutcome::Simulated(result),
        });
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::{CallRequest, ChainError, MockChain},
        transaction::Call,
    };
    use alloy::primitives::{address, Address, Bytes};
    use mockall::Sequence;
    use pretty_assertions::assert_eq;

    const FROM: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const FIRST: Address = address!("0x00000000000000000000000000000000000000b1");
    const SECOND: Address = address!("0x00000000000000000000000000000000000000b2");

    fn call_to(to: Address) -> Transaction {
        Transaction::batched(
            Some(FROM),
            vec![Call {
                to: Some(to),
                value: Some(U256::ZERO),
                input: None,
            }],
        )
    }

    fn two_step_flow() -> Flow {
        let mut flow = Flow::new("approve and transfer", None);
        flow.push_step("first", call_to(FIRST), vec![]);
        flow.push_step("second", call_to(SECOND), vec!["step-1".to_string()]);
        flow
    }

    #[test]
    fn test_step_ids_are_sequential() {
        let flow = two_step_flow();
        let ids: Vec<_> = flow.steps.iter().map(|step| step.id.as_str()).collect();
        assert_eq!(ids, vec!["step-1", "step-2"]);
        assert_eq!(flow.next_step_id(), "step-3");
    }

    #[test]
    fn test_unknown_dependencies_are_listed() {
        let mut flow = two_step_flow();
        flow.steps[0].dependencies = vec!["step-9".to_string()];

        assert_eq!(flow.unknown_dependencies(), vec![("step-1", "step-9")]);
    }

    #[test]
    fn test_flow_json_round_trip() {
        let flow = Flow {
            description: Some("two calls".to_string()),
            ..two_step_flow()
        };
        let json = serde_json::to_value(&flow).unwrap();
        assert!(json["steps"][0].get("dependencies").is_none());
        assert_eq!(json["steps"][1]["dependencies"][0], "step-1");
        assert_eq!(json["steps"][1]["transaction"]["nonceKey"], "0");

        let parsed: Flow = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, flow);
    }

    #[test]
    fn test_flow_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");
        let flow = two_step_flow();

        flow.save(&path).unwrap();
        assert_eq!(Flow::load(&path).unwrap(), flow);
    }

    #[tokio::test]
    async fn test_steps_run_in_stored_order() {
        let mut chain = MockChain::new();
        let mut seq = Sequence::new();
        for (target, gas) in [(FIRST, 30_000u64), (SECOND, 40_000u64)] {
            chain
                .expect_estimate_gas()
                .withf(move |request: &CallRequest| request.to == Some(target))
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(gas));
            chain
                .expect_call()
                .withf(move |request: &CallRequest| request.to == Some(target))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(Bytes::new()));
        }

        let mut flow = two_step_flow();
        let reports = run_flow(&chain, &mut flow).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].gas_estimate, Some(30_000));
        assert_eq!(reports[1].gas_estimate, Some(40_000));
        assert!(reports
            .iter()
            .all(|report| matches!(&report.outcome, StepOutcome::Simulated(r) if r.is_success())));
        assert_eq!(flow.steps[1].transaction.gas, Some(U256::from(40_000)));
    }

    #[tokio::test]
    async fn test_failed_estimate_skips_simulation_only_for_that_step() {
        let mut chain = MockChain::new();
        chain
            .expect_estimate_gas()
            .withf(|request: &CallRequest| request.to == Some(FIRST))
            .returning(|_| Err(ChainError::Transport("timeout".to_string())));
        chain
            .expect_estimate_gas()
            .withf(|request: &CallRequest| request.to == Some(SECOND))
            .returning(|_| Ok(21_000));
        chain
            .expect_call()
            .withf(|request: &CallRequest| request.to == Some(SECOND))
            .times(1)
            .returning(|_| Ok(Bytes::new()));

        let mut flow = two_step_flow();
        let reports = run_flow(&chain, &mut flow).await;

        assert_eq!(
            reports[0].outcome,
            StepOutcome::EstimationFailed("gas estimation failed: timeout".to_string())
        );
        assert_eq!(flow.steps[0].transaction.gas, None);
        assert!(matches!(&reports[1].outcome, StepOutcome::Simulated(r) if r.is_success()));
    }

    #[tokio::test]
    async fn test_step_without_sender_is_only_simulated() {
        let mut chain = MockChain::new();
        chain.expect_estimate_gas().never();
        chain.expect_call().times(1).returning(|_| Ok(Bytes::new()));

        let mut flow = Flow::new("anonymous", None);
        flow.push_step("read", Transaction::legacy(None, Some(FIRST), None, None), vec![]);
        let reports = run_flow(&chain, &mut flow).await;

        assert_eq!(reports[0].gas_estimate, None);
    }
}
