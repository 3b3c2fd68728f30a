//! Implementations of the various deploy scripts

use std::{
    io::{self, Write},
    path::Path,
};

use tracing::info;

use crate::{
    artifacts::ArtifactResolver, cli::DeployArgs, context::NetworkContext,
    deployer::ChainDeployer, sequencer::deploy, types::RunOutcome,
};

/// Deploy the demo contracts through the given context
pub async fn deploy_contracts(
    args: DeployArgs,
    context: &NetworkContext,
    artifacts_dir: &Path,
) -> RunOutcome {
    let requests = args.requests();
    info!(
        network = %context.network(),
        deployer = %context.deployer_address(),
        "deploying {} contract(s)",
        requests.len()
    );

    let deployer = ChainDeployer::new(context, ArtifactResolver::new(artifacts_dir))
        .with_confirmations(args.confirmations)
        .with_timeout(args.timeout());

    deploy(&deployer, requests).await
}

/// Print the addresses of the accounts available for signing
pub fn print_accounts<W: Write>(context: &NetworkContext, out: &mut W) -> io::Result<()> {
    for account in context.accounts() {
        writeln!(out, "{}", account.to_checksum(None))?;
    }
    out.flush()
}
