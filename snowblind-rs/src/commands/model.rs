//! Whole-model export
//!
//! A model lump `name.lmp` conventionally holds `name.tex`, `name.vif` and
//! `name.anm`. The texture is decoded first so its size can normalise the
//! mesh UVs.

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use snow_anm::decode_animation;
use snow_gob::{ArchiveDirectory, ByteRegion, LmpArchive};
use snow_tex::decode_texture;
use snow_vif::{UvScale, decode_vif};

use super::tex::save_png;
use super::vif::save_obj;
use crate::utils::{AssetKind, open_lump, read_file};

#[derive(Args)]
pub struct ModelArgs {
    /// A .gob archive holding the model lump, or the .lmp itself
    pub file: PathBuf,

    /// Model name; the lump `NAME.lmp` is read from a GOB
    pub name: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Scale PS2 half-range alpha to full range in the PNG
    #[arg(long)]
    pub expand_alpha: bool,
}

/// Entry of `kind` whose stem matches `stem`, ignoring case
fn find_part<'a>(lmp: &LmpArchive<'a>, stem: &str, kind: AssetKind) -> Option<(String, ByteRegion<'a>)> {
    let name = lmp.entry_names().into_iter().find(|name| {
        AssetKind::from_name(name) == kind
            && Path::new(name)
                .file_stem()
                .is_some_and(|s| s.to_string_lossy().eq_ignore_ascii_case(stem))
    })?;
    let region = lmp.find_entry(name)?;
    Some((name.to_string(), region))
}

pub fn execute(args: ModelArgs) -> Result<()> {
    let stem = Path::new(&args.name)
        .file_stem()
        .map_or_else(|| args.name.clone(), |s| s.to_string_lossy().into_owned());
    let data = read_file(&args.file)?;
    let lump = match AssetKind::from_name(&args.file.to_string_lossy()) {
        AssetKind::Gob => Some(format!("{stem}.{}", AssetKind::Lump.extension())),
        _ => None,
    };
    let lmp = open_lump(&args.file, &data, lump.as_deref())?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create directory: {}", args.out.display()))?;
    let target = |ext: &str| args.out.join(format!("{stem}.{ext}"));
    let mut exported = 0usize;

    let mut scale = UvScale::TEXELS;
    if let Some((name, region)) = find_part(&lmp, &stem, AssetKind::Texture) {
        let texture = decode_texture(&region).with_context(|| format!("Failed to decode {name}"))?;
        if texture.is_empty() {
            log::warn!("{name} holds no pixel data, mesh UVs stay in texels");
        } else {
            scale = UvScale::from_texture_size(texture.width(), texture.height());
            let png = target("png");
            save_png(&texture, &png, args.expand_alpha)?;
            println!(
                "{} {} ({}x{}) -> {}",
                style("✓").green(),
                name,
                texture.width(),
                texture.height(),
                png.display()
            );
            exported += 1;
        }
    }

    if let Some((name, region)) = find_part(&lmp, &stem, AssetKind::Mesh) {
        let model = decode_vif(&region, scale).with_context(|| format!("Failed to decode {name}"))?;
        let obj = target("obj");
        match save_obj(&model, None, &obj) {
            Ok(count) => {
                println!(
                    "{} {} ({} of {} meshes) -> {}",
                    style("✓").green(),
                    name,
                    count,
                    model.meshes().len(),
                    obj.display()
                );
                exported += 1;
            }
            Err(e) => log::warn!("{name}: {e}"),
        }
    }

    if let Some((name, region)) = find_part(&lmp, &stem, AssetKind::Animation) {
        let clip = decode_animation(&region).with_context(|| format!("Failed to decode {name}"))?;
        #[cfg(feature = "serde")]
        {
            let json = target("json");
            super::anm::save_json(&name, &clip, true, &json)?;
            println!(
                "{} {} ({} bones, {} frames) -> {}",
                style("✓").green(),
                name,
                clip.num_bones(),
                clip.num_frames(),
                json.display()
            );
        }
        #[cfg(not(feature = "serde"))]
        println!(
            "{} {} ({} bones, {} frames), build with the serde feature to export",
            style("-").yellow(),
            name,
            clip.num_bones(),
            clip.num_frames()
        );
        exported += 1;
    }

    if exported == 0 {
        bail!("No texture, mesh or animation named {stem} could be exported");
    }
    Ok(())
}
