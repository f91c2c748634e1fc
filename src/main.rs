use airsense::cli::{run, Cli};
use airsense::utils::logging;
use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref()).context("failed to initialize logging")?;
    run(cli).context("airsense failed")
}
