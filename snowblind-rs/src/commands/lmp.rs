//! LMP lump command implementations

use anyhow::Result;
use clap::Subcommand;
use std::path::{Path, PathBuf};

use snow_gob::ArchiveDirectory;

use crate::utils::{
    AssetKind, add_table_row, create_table, format_bytes, format_offset, open_lump, read_file,
};

#[derive(Subcommand)]
pub enum LmpCommands {
    /// List the entries of a lump
    List {
        /// Path to a .lmp file, or a .gob holding the lump
        file: PathBuf,

        /// Lump to list when FILE is a GOB archive
        #[arg(short, long)]
        lump: Option<String>,
    },
}

pub fn execute(command: LmpCommands) -> Result<()> {
    match command {
        LmpCommands::List { file, lump } => list_lump(&file, lump.as_deref()),
    }
}

fn list_lump(path: &Path, lump: Option<&str>) -> Result<()> {
    let data = read_file(path)?;
    let lmp = open_lump(path, &data, lump)?;
    let base = lmp.region().start();

    let mut table = create_table(&["Entry", "Kind", "Offset", "Size"]);
    for (name, region) in lmp.directory().iter() {
        add_table_row(
            &mut table,
            [
                name.to_string(),
                AssetKind::from_name(name).label().to_string(),
                format_offset(region.start() - base),
                format_bytes(region.len() as u64),
            ],
        );
    }
    table.printstd();
    println!("{} entries", lmp.directory().len());
    Ok(())
}
