mod cli;
mod execute;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use crate::cli::CLI;

fn main() {
    // Diagnostics go to stderr so the invoked tool owns stdout.
    let filter = EnvFilter::try_from_env("INSTALL_RUN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("install_run=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = CLI::parse();
    std::process::exit(execute::execute(cli));
}
