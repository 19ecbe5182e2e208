//! GOB archive command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use snow_gob::{ArchiveDirectory, ByteRegion, LmpArchive};

use crate::utils::tree::{TreeNode, TreeOptions, render_tree};
use crate::utils::{
    add_table_row, create_progress_bar, create_table, format_bytes, format_offset, open_gob,
    read_file,
};

#[derive(Subcommand)]
pub enum GobCommands {
    /// List the lumps of a GOB archive
    List {
        /// Path to the GOB archive
        file: PathBuf,

        /// Filter lumps by glob pattern
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Extract lumps from a GOB archive
    Extract {
        /// Path to the GOB archive
        file: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Lumps to extract (extracts all if not specified)
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// Also unpack each lump's entries into a directory named after it
        #[arg(short, long)]
        unpack: bool,
    },

    /// Show the GOB, lump and entry hierarchy
    Tree {
        /// Path to the GOB archive
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Hide offsets and entry counts
        #[arg(long)]
        no_metadata: bool,
    },
}

pub fn execute(command: GobCommands) -> Result<()> {
    match command {
        GobCommands::List { file, filter } => list_gob(&file, filter.as_deref()),
        GobCommands::Extract {
            file,
            output,
            entries,
            unpack,
        } => extract_gob(&file, &output, &entries, unpack),
        GobCommands::Tree {
            file,
            depth,
            no_color,
            no_metadata,
        } => tree_gob(
            &file,
            &TreeOptions {
                max_depth: depth,
                no_color,
                show_metadata: !no_metadata,
            },
        ),
    }
}

/// Bytes of a GOB entry that belong to its lump
fn lump_bytes<'a>(name: &str, region: ByteRegion<'a>) -> &'a [u8] {
    match LmpArchive::parse(region) {
        Ok(lmp) => &region.as_slice()[..lmp.extent()],
        Err(e) => {
            log::warn!("{name} is not a readable lump ({e}), copying to end of archive");
            region.as_slice()
        }
    }
}

fn list_gob(path: &Path, filter: Option<&str>) -> Result<()> {
    let data = read_file(path)?;
    let gob = open_gob(path, &data)?;
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    let mut table = create_table(&["Lump", "Offset", "Size", "Entries"]);
    let mut shown = 0usize;
    for (name, region) in gob.directory().iter() {
        if pattern.as_ref().is_some_and(|p| !p.matches(name)) {
            continue;
        }
        let (size, entries) = match LmpArchive::parse(region) {
            Ok(lmp) => (lmp.extent(), lmp.directory().len().to_string()),
            Err(_) => (region.len(), "-".to_string()),
        };
        add_table_row(
            &mut table,
            [
                name.to_string(),
                format_offset(region.start()),
                format_bytes(size as u64),
                entries,
            ],
        );
        shown += 1;
    }

    if shown == 0 {
        println!("No lumps found matching pattern: {}", filter.unwrap_or("*"));
        return Ok(());
    }
    table.printstd();
    println!("{} of {} lumps", shown, gob.directory().len());
    Ok(())
}

fn extract_gob(path: &Path, output: &Path, entries: &[String], unpack: bool) -> Result<()> {
    let data = read_file(path)?;
    let gob = open_gob(path, &data)?;

    let names: Vec<String> = if entries.is_empty() {
        gob.entry_names().into_iter().map(str::to_string).collect()
    } else {
        entries.to_vec()
    };

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create directory: {}", output.display()))?;

    let pb = create_progress_bar(names.len() as u64, "Extracting lumps");
    let mut failed = 0usize;
    for name in &names {
        pb.set_message(format!("Extracting: {name}"));
        match gob.require_entry(name) {
            Ok(region) => {
                let bytes = lump_bytes(name, region);
                let target = output.join(name);
                fs::write(&target, bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                if unpack {
                    unpack_lump(name, region, output)?;
                }
            }
            Err(e) => {
                log::warn!("Failed to extract {name}: {e}");
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Extraction complete");

    println!(
        "{} Extracted {} lumps to {}",
        style("✓").green(),
        names.len() - failed,
        output.display()
    );
    if failed > 0 {
        anyhow::bail!("{failed} lumps could not be extracted");
    }
    Ok(())
}

fn unpack_lump(name: &str, region: ByteRegion<'_>, output: &Path) -> Result<()> {
    let lmp = LmpArchive::parse(region).with_context(|| format!("Failed to parse lump: {name}"))?;
    let stem = Path::new(name)
        .file_stem()
        .map_or_else(|| name.to_string(), |s| s.to_string_lossy().into_owned());
    let dir = output.join(stem);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for (entry, bytes) in lmp.directory().iter() {
        let target = dir.join(entry);
        fs::write(&target, bytes.as_slice())
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }
    log::info!("Unpacked {} entries of {name}", lmp.directory().len());
    Ok(())
}

fn tree_gob(path: &Path, options: &TreeOptions) -> Result<()> {
    let data = read_file(path)?;
    let gob = open_gob(path, &data)?;

    let root_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut root = TreeNode::new(root_name)
        .with_size(data.len() as u64)
        .with_metadata("lumps", gob.directory().len().to_string());

    for (name, region) in gob.directory().iter() {
        let mut node = TreeNode::new(name).with_metadata("offset", format_offset(region.start()));
        match LmpArchive::parse(region) {
            Ok(lmp) => {
                node = node
                    .with_size(lmp.extent() as u64)
                    .with_metadata("entries", lmp.directory().len().to_string());
                for (entry, bytes) in lmp.directory().iter() {
                    node = node.add_child(
                        TreeNode::new(entry)
                            .with_size(bytes.len() as u64)
                            .with_metadata("offset", format_offset(bytes.start() - region.start())),
                    );
                }
            }
            Err(e) => {
                node = node.with_metadata("error", e.to_string());
            }
        }
        root = root.add_child(node);
    }

    print!("{}", render_tree(&root, options));
    Ok(())
}
