//! Waiting on submitted deployments

use tracing::{error, info};

use crate::{
    deployer::Deployer,
    errors::DeployError,
    sequencer::DeploymentHandle,
    types::DeploymentResult,
};

/// Wait for a submitted deployment to be included.
///
/// The handle is consumed, so each deployment reaches a terminal state
/// exactly once. A failed confirmation is not retried.
pub async fn await_confirmation<D: Deployer>(
    deployer: &D,
    handle: DeploymentHandle<D::Pending>,
) -> Result<DeploymentResult, DeployError> {
    let DeploymentHandle {
        position,
        request,
        tx_hash,
        submitted_at,
        pending,
    } = handle;
    let contract_name = request.contract_name;

    match deployer.confirm(&contract_name, pending).await {
        Ok(address) => {
            info!(
                contract = %contract_name,
                position,
                %address,
                elapsed = ?submitted_at.elapsed(),
                "deployment confirmed"
            );
            Ok(DeploymentResult {
                contract_name,
                address,
            })
        }
        Err(e) => {
            error!(contract = %contract_name, position, %tx_hash, "deployment failed: {e}");
            Err(e)
        }
    }
}
