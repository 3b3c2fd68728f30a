//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::primitives::Address;
use clap::ValueEnum;

use crate::{
    constants::{HARDHAT_CHAIN_ID, HARDHAT_RPC_URL, RINKEBY_CHAIN_ID},
    errors::DeployError,
};

/// The networks the contracts can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// A local Hardhat development node
    Hardhat,
    /// The Rinkeby testnet
    Rinkeby,
}

impl Network {
    /// The RPC URL used when none is given explicitly
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Network::Hardhat => Some(HARDHAT_RPC_URL),
            Network::Rinkeby => None,
        }
    }

    /// The chain ID a node on this network must report
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Hardhat => HARDHAT_CHAIN_ID,
            Network::Rinkeby => RINKEBY_CHAIN_ID,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Hardhat => write!(f, "hardhat"),
            Network::Rinkeby => write!(f, "rinkeby"),
        }
    }
}

/// A request to deploy one instance of a contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// The name of the contract, bare or fully qualified
    pub contract_name: String,
    /// The constructor arguments, coerced against the constructor ABI on submission
    pub constructor_args: Vec<String>,
}

impl DeploymentRequest {
    /// Create a new deployment request
    pub fn new<S: ToString>(contract_name: &str, constructor_args: &[S]) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            constructor_args: constructor_args.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A confirmed deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentResult {
    /// The name of the deployed contract
    pub contract_name: String,
    /// The address the contract is live at
    pub address: Address,
}

/// The terminal value of a deployment run
#[derive(Debug)]
pub enum RunOutcome {
    /// Every request was deployed and confirmed, results are in request order
    AllSucceeded(Vec<DeploymentResult>),
    /// The run failed
    Failed {
        /// The first error encountered
        reason: DeployError,
        /// The deployments that did confirm, in request order
        partial: Vec<DeploymentResult>,
    },
}

impl RunOutcome {
    /// The deployments that confirmed during the run
    pub fn results(&self) -> &[DeploymentResult] {
        match self {
            RunOutcome::AllSucceeded(results) => results,
            RunOutcome::Failed { partial, .. } => partial,
        }
    }

    /// Whether every request was deployed
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::AllSucceeded(_))
    }
}
