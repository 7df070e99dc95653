use std::process::ExitCode;

use clap::Parser;

use cyclecast::cli::{self, Cli};
use cyclecast::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_format.into()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "cyclecast starting");

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
