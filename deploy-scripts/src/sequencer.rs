//! Drives a sequence of deployment requests to completion

use std::time::Instant;

use alloy::primitives::TxHash;
use futures::future::join_all;
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::{
    deployer::{Deployer, Submission},
    errors::DeployError,
    types::{DeploymentRequest, DeploymentResult, RunOutcome},
    waiter::await_confirmation,
};

/// A deployment that has been submitted but not yet confirmed
pub struct DeploymentHandle<P> {
    /// The index of the request in the run
    pub position: usize,
    /// The request the deployment was made for
    pub request: DeploymentRequest,
    /// The hash of the creation transaction
    pub tx_hash: TxHash,
    /// When the transaction was accepted
    pub submitted_at: Instant,
    /// The backend's handle on the in-flight transaction
    pub pending: P,
}

/// Deploy every request, in order.
///
/// Submissions are made one after another without waiting for earlier
/// confirmations; confirmations are then awaited concurrently. Results are
/// reported in request order regardless of the order in which they confirm.
///
/// A failed submission stops any further submissions, but deployments that
/// were already submitted are still waited on before the run fails.
pub async fn deploy<D: Deployer>(deployer: &D, requests: Vec<DeploymentRequest>) -> RunOutcome {
    let mut handles = Vec::with_capacity(requests.len());
    let mut failure: Option<DeployError> = None;

    for (position, request) in requests.into_iter().enumerate() {
        match deployer.submit(&request).await {
            Ok(Submission { tx_hash, pending }) => {
                info!(
                    contract = %request.contract_name,
                    position,
                    %tx_hash,
                    "deployment submitted"
                );
                handles.push(DeploymentHandle {
                    position,
                    request,
                    tx_hash,
                    submitted_at: Instant::now(),
                    pending,
                });
            }
            Err(e) => {
                error!(contract = %request.contract_name, position, "submission failed: {e}");
                failure = Some(e);
                break;
            }
        }
    }

    if failure.is_some() && !handles.is_empty() {
        warn!(
            "waiting on {} submitted deployment(s) before aborting",
            handles.len()
        );
    }

    let confirmations = join_all(
        handles
            .into_iter()
            .map(|handle| await_confirmation(deployer, handle)),
    )
    .await;
    let (results, errors): (Vec<DeploymentResult>, Vec<DeployError>) =
        confirmations.into_iter().partition_result();

    // A submission failure takes precedence, otherwise the earliest request to fail
    for e in errors {
        match failure {
            None => failure = Some(e),
            Some(_) => warn!("additional deployment failure: {e}"),
        }
    }

    match failure {
        None => RunOutcome::AllSucceeded(results),
        Some(reason) => RunOutcome::Failed {
            reason,
            partial: results,
        },
    }
}
