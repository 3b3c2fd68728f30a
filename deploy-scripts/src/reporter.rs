//! Reporting the outcome of a deployment run

use std::io::{self, Write};

use crate::types::RunOutcome;

/// The exit status of a run in which every deployment confirmed
pub const SUCCESS_EXIT_CODE: u8 = 0;

/// The exit status of a failed run
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Write the outcome of a run, returning the exit status for the process.
///
/// Each confirmed deployment is written to `out` as
/// `<contract> deployed to: <address>`, in request order. On failure the
/// reason is written to `err` after any partial results.
pub fn report<O: Write, E: Write>(outcome: &RunOutcome, out: &mut O, err: &mut E) -> io::Result<u8> {
    for result in outcome.results() {
        writeln!(
            out,
            "{} deployed to: {}",
            result.contract_name,
            result.address.to_checksum(None)
        )?;
    }
    out.flush()?;

    match outcome {
        RunOutcome::AllSucceeded(_) => Ok(SUCCESS_EXIT_CODE),
        RunOutcome::Failed { reason, .. } => {
            writeln!(err, "Error: {reason}")?;
            Ok(FAILURE_EXIT_CODE)
        }
    }
}
