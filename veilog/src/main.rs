// veilog/src/main.rs
//! Veilog entry point: parse arguments, set up logging, dispatch.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use veilog::cli::{Cli, Commands};
use veilog::{commands, logger};

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    match &args.command {
        Commands::Redact(cmd) => commands::redact::run(cmd),
        Commands::Decrypt(cmd) => commands::decrypt::run(cmd),
        Commands::Check(cmd) => commands::check::run(cmd),
    }
}
