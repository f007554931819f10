mod agents;
mod cli;
mod config;
mod error;
mod sources;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures; everything else is a usage error.
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::VERBOSE_ENV, "1");
        }
    }

    if let Err(e) = workflow::execute_update(&cli.catalog, cli.variant, cli.dry_run) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
