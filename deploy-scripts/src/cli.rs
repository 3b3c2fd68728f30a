//! Definitions of CLI arguments and commands for deploy scripts

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use eyre::Result;

use crate::{
    commands::{deploy_contracts, print_accounts},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEMO_TOKEN_NAME, DEFAULT_DEMO_TOKEN_SYMBOL,
        DEMO_ALLOCATIONS_CONTRACT, DEMO_CONTRACT, NUM_DEPLOY_CONFIRMATIONS,
    },
    context::{NetworkConfig, NetworkContext},
    reporter::{report, SUCCESS_EXIT_CODE},
    types::{DeploymentRequest, Network, RunOutcome},
};

/// Deploy the demo contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, value_enum, env = "NETWORK", default_value_t = Network::Hardhat)]
    pub network: Network,

    /// Network RPC URL, defaults to the network's local endpoint if it has one
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the deployer, defaults to the first development
    /// account on the Hardhat network
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,

    /// Path to the Hardhat artifacts directory
    #[arg(short, long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands the scripts support
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the `Demo` token and the `DemoAllocations` contract
    Deploy(DeployArgs),
    /// Print the accounts available for signing
    Accounts,
}

/// Deploy the demo contracts.
///
/// The two contracts are independent of one another; both creation
/// transactions are sent before either is waited on.
#[derive(Args)]
pub struct DeployArgs {
    /// The name passed to the `Demo` token's constructor
    #[arg(long, default_value = DEFAULT_DEMO_TOKEN_NAME)]
    pub demo_name: String,

    /// The symbol passed to the `Demo` token's constructor
    #[arg(long, default_value = DEFAULT_DEMO_TOKEN_SYMBOL)]
    pub demo_symbol: String,

    /// The number of confirmations to wait for on each deployment, at least one
    #[arg(
        long,
        default_value_t = NUM_DEPLOY_CONFIRMATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub confirmations: u64,

    /// The number of seconds to wait for each deployment to confirm,
    /// waits indefinitely if unset
    #[arg(long)]
    pub confirmation_timeout: Option<u64>,
}

impl DeployArgs {
    /// The deployments to make, in order
    pub fn requests(&self) -> Vec<DeploymentRequest> {
        vec![
            DeploymentRequest::new(DEMO_CONTRACT, &[&self.demo_name, &self.demo_symbol]),
            DeploymentRequest::new::<String>(DEMO_ALLOCATIONS_CONTRACT, &[]),
        ]
    }

    /// The bound on each confirmation wait
    pub fn timeout(&self) -> Option<Duration> {
        self.confirmation_timeout.map(Duration::from_secs)
    }
}

impl Command {
    /// Connect to the network and run the command, writing its output to
    /// `out` and diagnostics to `err`.
    ///
    /// Returns the process exit status.
    pub async fn run<O: Write, E: Write>(
        self,
        config: &NetworkConfig,
        artifacts_dir: &Path,
        out: &mut O,
        err: &mut E,
    ) -> Result<u8> {
        // The context is released before anything is reported
        let outcome = match NetworkContext::acquire(config).await {
            Ok(context) => match self {
                Command::Deploy(args) => deploy_contracts(args, &context, artifacts_dir).await,
                Command::Accounts => {
                    print_accounts(&context, out)?;
                    return Ok(SUCCESS_EXIT_CODE);
                }
            },
            Err(e) => RunOutcome::Failed {
                reason: e,
                partial: Vec::new(),
            },
        };

        Ok(report(&outcome, out, err)?)
    }
}
