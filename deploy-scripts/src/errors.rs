//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur while deploying the contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// Error connecting to the network or initializing the signer
    Connection(String),
    /// No compilation artifact exists for the requested contract
    ArtifactNotFound(String),
    /// Error reading or parsing a compilation artifact
    ArtifactParsing(String),
    /// Error encoding constructor arguments for a contract
    CalldataConstruction {
        /// The contract being deployed
        contract: String,
        /// The underlying cause
        reason: String,
    },
    /// The signer or transport rejected a deployment transaction
    Submission {
        /// The contract being deployed
        contract: String,
        /// The underlying cause
        reason: String,
    },
    /// A deployment transaction was not confirmed
    Confirmation {
        /// The contract being deployed
        contract: String,
        /// The underlying cause
        reason: String,
    },
}

impl DeployError {
    /// Build a [`DeployError::CalldataConstruction`] for the given contract
    pub fn calldata(contract: &str, reason: impl ToString) -> Self {
        DeployError::CalldataConstruction {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`DeployError::Submission`] for the given contract
    pub fn submission(contract: &str, reason: impl ToString) -> Self {
        DeployError::Submission {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`DeployError::Confirmation`] for the given contract
    pub fn confirmation(contract: &str, reason: impl ToString) -> Self {
        DeployError::Confirmation {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::Connection(s) => write!(f, "error connecting to network: {}", s),
            DeployError::ArtifactNotFound(name) => {
                write!(f, "no compiled artifact found for contract {}", name)
            }
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            DeployError::CalldataConstruction { contract, reason } => {
                write!(f, "error constructing calldata for {}: {}", contract, reason)
            }
            DeployError::Submission { contract, reason } => {
                write!(f, "error submitting deployment of {}: {}", contract, reason)
            }
            DeployError::Confirmation { contract, reason } => {
                write!(f, "error confirming deployment of {}: {}", contract, reason)
            }
        }
    }
}

impl Error for DeployError {}
