use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};

use alloy::primitives::{address, keccak256, Address};
use deploy_scripts::{
    deployer::{Deployer, Submission},
    errors::DeployError,
    reporter::{report, FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE},
    sequencer::deploy,
    types::{DeploymentRequest, RunOutcome},
};
use eyre::{eyre, Result};

/// The address the mock deployer sends from
const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

// ---------
// | Mocks |
// ---------

/// An in-flight mock deployment
struct MockPending {
    address: Address,
    delay: Duration,
}

/// A deployer that records what it is asked to do and fails on request
#[derive(Default)]
struct MockDeployer {
    /// Errors to return when submitting the named contract
    submission_failures: HashMap<String, DeployError>,
    /// Reasons to fail confirming the named contract with
    confirmation_failures: HashMap<String, String>,
    /// How long confirming the named contract takes
    confirmation_delays: HashMap<String, Duration>,
    next_nonce: AtomicU64,
    submitted: Mutex<Vec<String>>,
    confirmed: Mutex<Vec<String>>,
}

impl MockDeployer {
    fn fail_submission(mut self, contract: &str, error: DeployError) -> Self {
        self.submission_failures.insert(contract.to_string(), error);
        self
    }

    fn fail_confirmation(mut self, contract: &str, reason: &str) -> Self {
        self.confirmation_failures
            .insert(contract.to_string(), reason.to_string());
        self
    }

    fn delay_confirmation(mut self, contract: &str, millis: u64) -> Self {
        self.confirmation_delays
            .insert(contract.to_string(), Duration::from_millis(millis));
        self
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    fn confirmed(&self) -> Vec<String> {
        self.confirmed.lock().unwrap().clone()
    }
}

impl Deployer for MockDeployer {
    type Pending = MockPending;

    async fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> Result<Submission<MockPending>, DeployError> {
        let name = &request.contract_name;
        if let Some(e) = self.submission_failures.get(name) {
            return Err(e.clone());
        }

        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(name.clone());

        Ok(Submission {
            tx_hash: keccak256(nonce.to_be_bytes()),
            pending: MockPending {
                address: DEPLOYER.create(nonce),
                delay: self.confirmation_delays.get(name).copied().unwrap_or_default(),
            },
        })
    }

    async fn confirm(
        &self,
        contract_name: &str,
        pending: MockPending,
    ) -> Result<Address, DeployError> {
        tokio::time::sleep(pending.delay).await;
        self.confirmed
            .lock()
            .unwrap()
            .push(contract_name.to_string());

        match self.confirmation_failures.get(contract_name) {
            Some(reason) => Err(DeployError::confirmation(contract_name, reason)),
            None => Ok(pending.address),
        }
    }
}

// -----------
// | Helpers |
// -----------

fn demo_requests() -> Vec<DeploymentRequest> {
    vec![
        DeploymentRequest::new("Demo", &["Demo", "DMO"]),
        DeploymentRequest::new::<String>("DemoAllocations", &[]),
    ]
}

fn result_names(outcome: &RunOutcome) -> Vec<&str> {
    outcome
        .results()
        .iter()
        .map(|r| r.contract_name.as_str())
        .collect()
}

/// Report an outcome into buffers, returning the exit status, stdout and stderr
fn report_to_strings(outcome: &RunOutcome) -> Result<(u8, String, String)> {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = report(outcome, &mut out, &mut err)?;
    Ok((code, String::from_utf8(out)?, String::from_utf8(err)?))
}

// --------------------
// | SEQUENCING TESTS |
// --------------------

#[tokio::test]
async fn test_all_confirm_in_request_order() -> Result<()> {
    // The first deployment confirms last
    let deployer = MockDeployer::default()
        .delay_confirmation("A", 60)
        .delay_confirmation("B", 30);
    let requests = vec![
        DeploymentRequest::new::<String>("A", &[]),
        DeploymentRequest::new::<String>("B", &[]),
        DeploymentRequest::new::<String>("C", &[]),
    ];

    let outcome = deploy(&deployer, requests).await;

    assert!(outcome.is_success());
    assert_eq!(result_names(&outcome), vec!["A", "B", "C"]);
    assert_eq!(deployer.submitted(), vec!["A", "B", "C"]);
    assert_eq!(deployer.confirmed(), vec!["C", "B", "A"]);

    let addresses = outcome.results().iter().map(|r| r.address).collect::<Vec<_>>();
    assert_eq!(
        addresses,
        vec![DEPLOYER.create(0), DEPLOYER.create(1), DEPLOYER.create(2)]
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_request_sequence() -> Result<()> {
    let deployer = MockDeployer::default();

    let outcome = deploy(&deployer, Vec::new()).await;

    assert!(outcome.is_success());
    assert!(outcome.results().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_names_deploy_separately() -> Result<()> {
    let deployer = MockDeployer::default();
    let requests = vec![
        DeploymentRequest::new("Demo", &["Demo", "DMO"]),
        DeploymentRequest::new("Demo", &["Demo", "DMO"]),
    ];

    let outcome = deploy(&deployer, requests).await;

    let RunOutcome::AllSucceeded(results) = outcome else {
        return Err(eyre!("expected both deployments to succeed"));
    };
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].contract_name, results[1].contract_name);
    assert_ne!(results[0].address, results[1].address);

    Ok(())
}

#[tokio::test]
async fn test_submission_failure_aborts_later_submissions() -> Result<()> {
    let deployer = MockDeployer::default()
        .fail_submission("B", DeployError::submission("B", "signer rejected transaction"));
    let requests = vec![
        DeploymentRequest::new::<String>("A", &[]),
        DeploymentRequest::new::<String>("B", &[]),
        DeploymentRequest::new::<String>("C", &[]),
    ];

    let outcome = deploy(&deployer, requests).await;

    // `A` was already in flight, so it is still waited on
    let RunOutcome::Failed { reason, partial } = outcome else {
        return Err(eyre!("expected the run to fail"));
    };
    assert_eq!(reason, DeployError::submission("B", "signer rejected transaction"));
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].contract_name, "A");
    assert_eq!(deployer.submitted(), vec!["A"]);
    assert_eq!(deployer.confirmed(), vec!["A"]);

    Ok(())
}

#[tokio::test]
async fn test_missing_artifact_fails_run() -> Result<()> {
    let deployer = MockDeployer::default()
        .fail_submission("Missing", DeployError::ArtifactNotFound("Missing".to_string()));
    let requests = vec![
        DeploymentRequest::new::<String>("Missing", &[]),
        DeploymentRequest::new::<String>("DemoAllocations", &[]),
    ];

    let outcome = deploy(&deployer, requests).await;

    let RunOutcome::Failed { reason, partial } = outcome else {
        return Err(eyre!("expected the run to fail"));
    };
    assert_eq!(reason, DeployError::ArtifactNotFound("Missing".to_string()));
    assert!(partial.is_empty());
    assert!(deployer.submitted().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_confirmation_failure_keeps_other_results() -> Result<()> {
    let deployer = MockDeployer::default().fail_confirmation("Demo", "transaction reverted");

    let outcome = deploy(&deployer, demo_requests()).await;

    let RunOutcome::Failed { reason, partial } = outcome else {
        return Err(eyre!("expected the run to fail"));
    };
    assert_eq!(reason, DeployError::confirmation("Demo", "transaction reverted"));
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].contract_name, "DemoAllocations");

    Ok(())
}

#[tokio::test]
async fn test_earliest_confirmation_failure_is_reported() -> Result<()> {
    // `B` fails first in time, but `A` comes first in the request order
    let deployer = MockDeployer::default()
        .fail_confirmation("A", "out of gas")
        .fail_confirmation("B", "transaction reverted")
        .delay_confirmation("A", 40);
    let requests = vec![
        DeploymentRequest::new::<String>("A", &[]),
        DeploymentRequest::new::<String>("B", &[]),
    ];

    let outcome = deploy(&deployer, requests).await;

    let RunOutcome::Failed { reason, partial } = outcome else {
        return Err(eyre!("expected the run to fail"));
    };
    assert_eq!(reason, DeployError::confirmation("A", "out of gas"));
    assert!(partial.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_submission_failure_outranks_confirmation_failure() -> Result<()> {
    let deployer = MockDeployer::default()
        .fail_confirmation("Demo", "transaction reverted")
        .fail_submission(
            "DemoAllocations",
            DeployError::submission("DemoAllocations", "nonce too low"),
        );

    let outcome = deploy(&deployer, demo_requests()).await;

    let RunOutcome::Failed { reason, partial } = outcome else {
        return Err(eyre!("expected the run to fail"));
    };
    assert_eq!(
        reason,
        DeployError::submission("DemoAllocations", "nonce too low")
    );
    assert!(partial.is_empty());

    Ok(())
}

// ------------------
// | SCENARIO TESTS |
// ------------------

#[tokio::test]
async fn test_demo_deployment_output() -> Result<()> {
    let deployer = MockDeployer::default().delay_confirmation("Demo", 20);

    let outcome = deploy(&deployer, demo_requests()).await;
    let (code, out, err) = report_to_strings(&outcome)?;

    assert_eq!(code, SUCCESS_EXIT_CODE);
    assert_eq!(
        out,
        format!(
            "Demo deployed to: {}\nDemoAllocations deployed to: {}\n",
            DEPLOYER.create(0).to_checksum(None),
            DEPLOYER.create(1).to_checksum(None)
        )
    );
    assert!(err.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_demo_deployment_second_submission_fails() -> Result<()> {
    let deployer = MockDeployer::default().fail_submission(
        "DemoAllocations",
        DeployError::submission("DemoAllocations", "signer rejected transaction"),
    );

    let outcome = deploy(&deployer, demo_requests()).await;
    let (code, out, err) = report_to_strings(&outcome)?;

    assert_eq!(code, FAILURE_EXIT_CODE);
    assert_eq!(
        out,
        format!("Demo deployed to: {}\n", DEPLOYER.create(0).to_checksum(None))
    );
    assert!(err.contains("signer rejected transaction"));
    assert!(!out.contains("DemoAllocations"));

    Ok(())
}
