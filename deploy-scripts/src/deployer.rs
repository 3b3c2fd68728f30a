//! The interface between the deployment sequencer and a chain

use std::{future::Future, time::Duration};

use alloy::{
    network::ReceiptResponse,
    primitives::{Address, TxHash},
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use tracing::{debug, warn};

use crate::{
    artifacts::ArtifactResolver,
    constants::NUM_DEPLOY_CONFIRMATIONS,
    context::NetworkContext,
    errors::DeployError,
    factory::PendingDeployment,
    types::DeploymentRequest,
};

/// A deployment transaction accepted by the network
pub struct Submission<P> {
    /// The hash of the submitted transaction
    pub tx_hash: TxHash,
    /// The backend's handle on the in-flight transaction
    pub pending: P,
}

/// Submits contract creation transactions and waits for their inclusion
pub trait Deployer {
    /// The backend's handle on an in-flight transaction
    type Pending;

    /// Resolve the requested contract and submit its creation transaction,
    /// without waiting for it to be included
    fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> impl Future<Output = Result<Submission<Self::Pending>, DeployError>>;

    /// Wait for an in-flight creation transaction to be included, returning
    /// the address of the created contract
    fn confirm(
        &self,
        contract_name: &str,
        pending: Self::Pending,
    ) -> impl Future<Output = Result<Address, DeployError>>;
}

/// A [`Deployer`] submitting compiled artifacts through a [`NetworkContext`]
pub struct ChainDeployer<'a> {
    /// The connection and signer to deploy with
    context: &'a NetworkContext,
    /// Where to find the compiled contracts
    resolver: ArtifactResolver,
    /// The number of confirmations to wait for
    confirmations: u64,
    /// How long to wait for each confirmation, unbounded if `None`
    timeout: Option<Duration>,
}

impl<'a> ChainDeployer<'a> {
    /// Create a deployer waiting for the default number of confirmations
    /// with no timeout
    pub fn new(context: &'a NetworkContext, resolver: ArtifactResolver) -> Self {
        Self {
            context,
            resolver,
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            timeout: None,
        }
    }

    /// Set the number of confirmations to wait for, at least one
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    /// Bound each confirmation wait
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Deployer for ChainDeployer<'_> {
    type Pending = PendingDeployment;

    async fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> Result<Submission<PendingDeployment>, DeployError> {
        let factory = self.resolver.resolve(&request.contract_name, self.context)?;
        let pending = factory.deploy(&request.constructor_args).await?;

        Ok(Submission {
            tx_hash: pending.tx_hash(),
            pending,
        })
    }

    async fn confirm(
        &self,
        contract_name: &str,
        pending: PendingDeployment,
    ) -> Result<Address, DeployError> {
        let PendingDeployment {
            nonce,
            expected_address,
            pending_tx,
        } = pending;

        // Waits for the requested depth; the receipt is fetched once it is reached
        let tx_hash = pending_tx
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.timeout)
            .watch()
            .await
            .map_err(|e| DeployError::confirmation(contract_name, e))?;

        let receipt = self
            .context
            .provider()
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| DeployError::confirmation(contract_name, e))?
            .ok_or_else(|| {
                DeployError::confirmation(
                    contract_name,
                    format!("no receipt found for transaction {tx_hash}"),
                )
            })?;

        debug!(
            contract = contract_name,
            nonce,
            %tx_hash,
            confirmations = self.confirmations,
            "creation transaction confirmed"
        );
        deployed_address(contract_name, &receipt, expected_address)
    }
}

/// The address a confirmed creation transaction deployed to.
///
/// A reverted transaction is a confirmation failure. Nodes that omit the
/// created address fall back to the address implied by the pinned nonce.
pub fn deployed_address(
    contract_name: &str,
    receipt: &TransactionReceipt,
    expected_address: Address,
) -> Result<Address, DeployError> {
    if !ReceiptResponse::status(receipt) {
        return Err(DeployError::confirmation(
            contract_name,
            format!("transaction {} reverted", receipt.transaction_hash),
        ));
    }

    let address = match receipt.contract_address {
        Some(address) => {
            if address != expected_address {
                warn!(
                    contract = contract_name,
                    %address,
                    %expected_address,
                    "contract created at an unexpected address"
                );
            }
            address
        }
        None => expected_address,
    };

    Ok(address)
}
