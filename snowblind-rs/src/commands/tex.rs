//! Texture command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use console::style;
use std::path::{Path, PathBuf};

use snow_tex::{Rgba, Texture, TextureLayout, decode_texture, try_decode_texture};

use super::AssetArgs;
use crate::utils::{AssetKind, format_coverage, read_file};

#[derive(Subcommand)]
pub enum TexCommands {
    /// Display information about a texture
    Info {
        #[command(flatten)]
        asset: AssetArgs,

        /// Print the summary as JSON
        #[cfg(feature = "serde")]
        #[arg(long)]
        json: bool,
    },

    /// Convert a texture to PNG
    Convert {
        #[command(flatten)]
        asset: AssetArgs,

        /// Output image path
        output: PathBuf,

        /// Scale PS2 half-range alpha (0x80 = opaque) to full range
        #[arg(long)]
        expand_alpha: bool,
    },
}

pub fn execute(command: TexCommands) -> Result<()> {
    match command {
        #[cfg(feature = "serde")]
        TexCommands::Info { asset, json } => show_info(&asset, json),
        #[cfg(not(feature = "serde"))]
        TexCommands::Info { asset } => show_info(&asset, false),
        TexCommands::Convert {
            asset,
            output,
            expand_alpha,
        } => convert(&asset, &output, expand_alpha),
    }
}

/// Summary printed by `tex info`
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct TextureSummary {
    entry: String,
    size: usize,
    layout: TextureLayout,
    width: u32,
    height: u32,
    written_texels: usize,
}

fn show_info(asset: &AssetArgs, json: bool) -> Result<()> {
    let data = read_file(&asset.file)?;
    let (entry, region) = asset.resolve(&data, AssetKind::Texture)?;

    let layout = TextureLayout::detect(&region)
        .with_context(|| format!("Failed to read texture header: {entry}"))?;
    let texture = decode_texture(&region).with_context(|| format!("Failed to decode {entry}"))?;
    let summary = TextureSummary {
        entry,
        size: region.len(),
        layout,
        width: texture.width(),
        height: texture.height(),
        written_texels: texture.written_texels(),
    };

    if json {
        #[cfg(feature = "serde")]
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", style("Texture Information").bold().cyan());
    println!("{}", style("===================").cyan());
    println!("{}: {}", style("Entry").bold(), summary.entry);
    println!("{}: {} bytes", style("Size").bold(), summary.size);
    println!("{}: {:?}", style("Layout").bold(), summary.layout);
    if texture.is_empty() {
        println!("{}", style("No pixel data decoded").yellow());
        return Ok(());
    }
    println!(
        "{}: {}x{}",
        style("Dimensions").bold(),
        summary.width,
        summary.height
    );
    println!(
        "{}: {} ({})",
        style("Written texels").bold(),
        summary.written_texels,
        format_coverage(summary.written_texels, texture.pixels().len())
    );
    Ok(())
}

fn convert(asset: &AssetArgs, output: &Path, expand_alpha: bool) -> Result<()> {
    let data = read_file(&asset.file)?;
    let (entry, region) = asset.resolve(&data, AssetKind::Texture)?;

    let texture =
        try_decode_texture(&region).with_context(|| format!("Failed to decode {entry}"))?;
    if texture.is_empty() {
        bail!("{entry} holds no pixel data");
    }
    save_png(&texture, output, expand_alpha)?;

    println!(
        "{} Converted {} ({}x{}) to {}",
        style("✓").green(),
        entry,
        texture.width(),
        texture.height(),
        output.display()
    );
    Ok(())
}

/// Write `texture` as an image; unset texels become transparent
pub(crate) fn save_png(texture: &Texture, output: &Path, expand_alpha: bool) -> Result<()> {
    let image = if expand_alpha {
        texture.with_expanded_alpha().to_image(Rgba::TRANSPARENT)
    } else {
        texture.to_image(Rgba::TRANSPARENT)
    };
    image
        .save(output)
        .with_context(|| format!("Failed to save image: {}", output.display()))
}
