//! The network connection and signing identity shared by every deployment in a run

use std::{
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{debug, info};

use crate::{constants::DEFAULT_DEVNET_PKEY, errors::DeployError, types::Network};

/// The resolved connection parameters for a run
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// The network being deployed to
    pub network: Network,
    /// The RPC endpoint of a node on the network
    pub rpc_url: String,
    /// The private key of the deployer
    pub priv_key: String,
}

impl NetworkConfig {
    /// Resolve the connection parameters, falling back to the network's
    /// defaults for anything not given explicitly
    pub fn new(
        network: Network,
        rpc_url: Option<String>,
        priv_key: Option<String>,
    ) -> Result<Self, DeployError> {
        let rpc_url = rpc_url
            .or_else(|| network.default_rpc_url().map(String::from))
            .ok_or_else(|| {
                DeployError::Connection(format!("no RPC URL configured for {network}"))
            })?;

        // Only local development networks have a well-known deployer key
        let priv_key = match (priv_key, network) {
            (Some(key), _) => key,
            (None, Network::Hardhat) => DEFAULT_DEVNET_PKEY.to_string(),
            (None, _) => {
                return Err(DeployError::Connection(format!(
                    "no private key configured for {network}"
                )))
            }
        };

        Ok(Self {
            network,
            rpc_url,
            priv_key,
        })
    }
}

/// A connected provider bound to the deployer's signing key.
///
/// Acquired once per run and borrowed by every component that talks to the
/// chain. Dropping it releases the underlying connection.
pub struct NetworkContext {
    /// The network the context is connected to
    network: Network,
    /// The signer all transactions are sent from
    signer: PrivateKeySigner,
    /// The provider, with the signer attached as a wallet
    provider: DynProvider,
    /// The nonce to assign to the next transaction
    next_nonce: AtomicU64,
}

impl NetworkContext {
    /// Connect to the configured network and verify it is the one expected
    pub async fn acquire(config: &NetworkConfig) -> Result<Self, DeployError> {
        let url =
            Url::parse(&config.rpc_url).map_err(|e| DeployError::Connection(e.to_string()))?;
        let signer = PrivateKeySigner::from_str(&config.priv_key)
            .map_err(|e| DeployError::Connection(format!("invalid private key: {e}")))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .on_http(url);
        let provider = DynProvider::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| DeployError::Connection(e.to_string()))?;
        let expected_chain_id = config.network.chain_id();
        if chain_id != expected_chain_id {
            return Err(DeployError::Connection(format!(
                "expected chain ID {expected_chain_id} for {}, node reported {chain_id}",
                config.network
            )));
        }

        let nonce = provider
            .get_transaction_count(signer.address())
            .pending()
            .await
            .map_err(|e| DeployError::Connection(e.to_string()))?;

        info!(
            network = %config.network,
            chain_id,
            deployer = %signer.address(),
            "connected to network"
        );

        Ok(Self {
            network: config.network,
            signer,
            provider,
            next_nonce: AtomicU64::new(nonce),
        })
    }

    /// The network the context is connected to
    pub fn network(&self) -> Network {
        self.network
    }

    /// The provider used to submit transactions
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// The address transactions are sent from
    pub fn deployer_address(&self) -> Address {
        self.signer.address()
    }

    /// The accounts available for signing
    pub fn accounts(&self) -> Vec<Address> {
        vec![self.signer.address()]
    }

    /// Take the next nonce in the deployer's sequence
    pub fn reserve_nonce(&self) -> u64 {
        self.next_nonce.fetch_add(1, Ordering::SeqCst)
    }
}

impl Drop for NetworkContext {
    fn drop(&mut self) {
        debug!(network = %self.network, "releasing network context");
    }
}
