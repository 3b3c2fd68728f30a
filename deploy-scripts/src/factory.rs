//! Contract factories, which submit creation transactions for a compiled artifact

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::TransactionRequest,
};
use tracing::debug;

use crate::{artifacts::Artifact, context::NetworkContext, errors::DeployError};

/// A compiled contract bound to the signer of a [`NetworkContext`]
pub struct ContractFactory<'a> {
    /// The artifact to deploy
    artifact: Artifact,
    /// The context to submit through
    context: &'a NetworkContext,
}

/// A creation transaction that has been accepted by the node but not yet confirmed
pub struct PendingDeployment {
    /// The nonce the transaction was sent with
    pub nonce: u64,
    /// The address the contract will be created at
    pub expected_address: Address,
    /// The transport's handle on the pending transaction
    pub pending_tx: PendingTransactionBuilder<Ethereum>,
}

impl PendingDeployment {
    /// The hash of the creation transaction
    pub fn tx_hash(&self) -> TxHash {
        *self.pending_tx.tx_hash()
    }
}

impl<'a> ContractFactory<'a> {
    /// Bind an artifact to a context
    pub fn new(artifact: Artifact, context: &'a NetworkContext) -> Self {
        Self { artifact, context }
    }

    /// Submit a creation transaction with the given constructor arguments.
    ///
    /// Returns as soon as the node accepts the transaction.
    pub async fn deploy(&self, args: &[String]) -> Result<PendingDeployment, DeployError> {
        let contract = &self.artifact.contract_name;
        let deploy_code = self.artifact.deploy_code(args)?;

        // The nonce is pinned so the creation address is known before inclusion
        let deployer = self.context.deployer_address();
        let nonce = self.context.reserve_nonce();
        let tx = TransactionRequest::default()
            .with_from(deployer)
            .with_nonce(nonce)
            .with_deploy_code(deploy_code);

        let pending_tx = self
            .context
            .provider()
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::submission(contract, e))?;

        debug!(%contract, nonce, tx_hash = %pending_tx.tx_hash(), "creation transaction accepted");

        Ok(PendingDeployment {
            nonce,
            expected_address: creation_address(deployer, nonce),
            pending_tx,
        })
    }
}

/// The address a creation transaction sent by `deployer` with `nonce` deploys to
pub fn creation_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}
