//! vue-to-react: converts Vue options-API components into React TSX.

mod cli;
mod config;
mod error;
mod orchestrator;
mod output;
mod paths;

use clap::Parser;
use cli::Args;
use miette::Result;

fn main() -> Result<()> {
    let args = Args::parse();

    let report = orchestrator::run(&args)?;

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
