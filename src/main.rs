//! `cartridge-package` entrypoint.
//!
//! Builds the component archives of a cartridge and updates its Maven and
//! Ivy descriptors. See [`cartridge::run::run`] for the steps.

use cartridge::cli::Cli;
use cartridge::run::{exit_code_for_run_result, run};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
