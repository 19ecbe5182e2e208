//! Main entry point for the snowblind-rs CLI

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        #[cfg(feature = "gob")]
        Commands::Gob { command } => commands::gob::execute(command),

        #[cfg(feature = "gob")]
        Commands::Lmp { command } => commands::lmp::execute(command),

        #[cfg(feature = "tex")]
        Commands::Tex { command } => commands::tex::execute(command),

        #[cfg(feature = "vif")]
        Commands::Vif { command } => commands::vif::execute(command),

        #[cfg(feature = "anm")]
        Commands::Anm { command } => commands::anm::execute(command),

        #[cfg(all(feature = "tex", feature = "vif", feature = "anm"))]
        Commands::Model(args) => commands::model::execute(args),

        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
