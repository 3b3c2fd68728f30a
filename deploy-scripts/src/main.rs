use std::{io, process::ExitCode};

use clap::Parser;
use deploy_scripts::{
    cli::Cli,
    context::NetworkConfig,
    reporter::report,
    types::RunOutcome,
};
use eyre::Result;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let Cli {
        network,
        rpc_url,
        priv_key,
        artifacts,
        command,
    } = Cli::parse();

    // Logs go to stderr, stdout only carries the deployed addresses
    tracing_subscriber::fmt()
        .pretty()
        .with_writer(io::stderr)
        .init();

    let (mut out, mut err) = (io::stdout(), io::stderr());
    let code = match NetworkConfig::new(network, rpc_url, priv_key) {
        Ok(config) => command.run(&config, &artifacts, &mut out, &mut err).await?,
        Err(e) => {
            let outcome = RunOutcome::Failed {
                reason: e,
                partial: Vec::new(),
            };
            report(&outcome, &mut out, &mut err)?
        }
    };

    Ok(ExitCode::from(code))
}
