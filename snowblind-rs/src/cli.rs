//! Root CLI structure for snowblind-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snowblind-rs")]
#[command(about = "Command-line tools for Snowblind engine asset files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// GOB archive operations
    #[cfg(feature = "gob")]
    Gob {
        #[command(subcommand)]
        command: crate::commands::gob::GobCommands,
    },

    /// LMP lump operations
    #[cfg(feature = "gob")]
    Lmp {
        #[command(subcommand)]
        command: crate::commands::lmp::LmpCommands,
    },

    /// Texture operations
    #[cfg(feature = "tex")]
    Tex {
        #[command(subcommand)]
        command: crate::commands::tex::TexCommands,
    },

    /// VIF mesh operations
    #[cfg(feature = "vif")]
    Vif {
        #[command(subcommand)]
        command: crate::commands::vif::VifCommands,
    },

    /// Animation operations
    #[cfg(feature = "anm")]
    Anm {
        #[command(subcommand)]
        command: crate::commands::anm::AnmCommands,
    },

    /// Export the texture, mesh and animation of one model lump
    #[cfg(all(feature = "tex", feature = "vif", feature = "anm"))]
    Model(crate::commands::model::ModelArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
