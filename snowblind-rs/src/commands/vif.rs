//! VIF mesh command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use console::style;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use snow_gob::ArchiveDirectory;
use snow_tex::decode_texture;
use snow_vif::{DecodedMesh, SkinnedMesh, UvScale, VifModel, decode_vif};

use super::AssetArgs;
use crate::utils::{AssetKind, add_table_row, create_table, open_lump, read_file};

#[derive(Subcommand)]
pub enum VifCommands {
    /// Display the meshes of a VIF file
    Info {
        #[command(flatten)]
        asset: AssetArgs,

        /// Texture entry whose size normalises the UVs
        #[arg(short, long)]
        texture: Option<String>,

        /// Print the summary as JSON
        #[cfg(feature = "serde")]
        #[arg(long)]
        json: bool,
    },

    /// Export meshes to Wavefront OBJ
    Export {
        #[command(flatten)]
        asset: AssetArgs,

        /// Output OBJ path
        output: PathBuf,

        /// Texture entry whose size normalises the UVs
        #[arg(short, long)]
        texture: Option<String>,

        /// Export only this mesh
        #[arg(short, long)]
        mesh: Option<usize>,
    },
}

pub fn execute(command: VifCommands) -> Result<()> {
    match command {
        #[cfg(feature = "serde")]
        VifCommands::Info {
            asset,
            texture,
            json,
        } => show_info(&asset, texture.as_deref(), json),
        #[cfg(not(feature = "serde"))]
        VifCommands::Info { asset, texture } => show_info(&asset, texture.as_deref(), false),
        VifCommands::Export {
            asset,
            output,
            texture,
            mesh,
        } => export(&asset, &output, texture.as_deref(), mesh),
    }
}

/// UV scale from the named texture in the same lump, texels otherwise
fn uv_scale(asset: &AssetArgs, data: &[u8], texture: Option<&str>) -> Result<UvScale> {
    let Some(name) = texture else {
        return Ok(UvScale::TEXELS);
    };
    let lmp = open_lump(&asset.file, data, asset.lump.as_deref())
        .context("--texture needs FILE to be a .gob or .lmp")?;
    let region = lmp.require_entry(name)?;
    let texture = decode_texture(&region).with_context(|| format!("Failed to decode {name}"))?;
    if texture.is_empty() {
        log::warn!("{name} holds no pixel data, keeping UVs in texels");
        return Ok(UvScale::TEXELS);
    }
    Ok(UvScale::from_texture_size(texture.width(), texture.height()))
}

/// Per-mesh line of `vif info`
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct MeshSummary {
    index: usize,
    chunks: usize,
    stream: String,
    vertices: Option<usize>,
    triangles: Option<usize>,
    skinned: Option<bool>,
    error: Option<String>,
}

impl From<&DecodedMesh> for MeshSummary {
    fn from(decoded: &DecodedMesh) -> Self {
        let mesh = decoded.mesh.as_ref().ok();
        Self {
            index: decoded.index,
            chunks: decoded.chunk_count,
            stream: decoded.stop.to_string(),
            vertices: mesh.map(SkinnedMesh::vertex_count),
            triangles: mesh.map(SkinnedMesh::triangle_count),
            skinned: mesh.map(SkinnedMesh::is_skinned),
            error: decoded.mesh.as_ref().err().map(ToString::to_string),
        }
    }
}

fn show_info(asset: &AssetArgs, texture: Option<&str>, json: bool) -> Result<()> {
    let data = read_file(&asset.file)?;
    let (entry, region) = asset.resolve(&data, AssetKind::Mesh)?;
    let scale = uv_scale(asset, &data, texture)?;
    let model = decode_vif(&region, scale).with_context(|| format!("Failed to decode {entry}"))?;
    let summaries: Vec<MeshSummary> = model.meshes().iter().map(MeshSummary::from).collect();

    if json {
        #[cfg(feature = "serde")]
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", style("VIF Mesh Information").bold().cyan());
    println!("{}", style("====================").cyan());
    println!("{}: {}", style("Entry").bold(), entry);
    println!(
        "{}: {} ({} decoded)",
        style("Meshes").bold(),
        model.header().mesh_count,
        model.valid_meshes().count()
    );
    println!();

    let mut table = create_table(&[
        "Mesh",
        "Chunks",
        "Vertices",
        "Triangles",
        "Skinned",
        "Stream",
        "Status",
    ]);
    let dash = || "-".to_string();
    for summary in &summaries {
        add_table_row(
            &mut table,
            [
                summary.index.to_string(),
                summary.chunks.to_string(),
                summary.vertices.map_or_else(dash, |v| v.to_string()),
                summary.triangles.map_or_else(dash, |t| t.to_string()),
                summary.skinned.map_or_else(dash, |s| (if s { "yes" } else { "no" }).to_string()),
                summary.stream.clone(),
                summary.error.clone().unwrap_or_else(|| "ok".to_string()),
            ],
        );
    }
    table.printstd();
    Ok(())
}

fn export(asset: &AssetArgs, output: &Path, texture: Option<&str>, only: Option<usize>) -> Result<()> {
    let data = read_file(&asset.file)?;
    let (entry, region) = asset.resolve(&data, AssetKind::Mesh)?;
    let scale = uv_scale(asset, &data, texture)?;
    let model = decode_vif(&region, scale).with_context(|| format!("Failed to decode {entry}"))?;

    let written = save_obj(&model, only, output)?;
    println!(
        "{} Exported {} meshes of {} to {}",
        style("✓").green(),
        written,
        entry,
        output.display()
    );
    Ok(())
}

/// Write the valid meshes of `model` (or only mesh `only`) to an OBJ file,
/// returning how many were written
pub(crate) fn save_obj(model: &VifModel, only: Option<usize>, output: &Path) -> Result<usize> {
    let meshes: Vec<(usize, &SkinnedMesh)> = model
        .meshes()
        .iter()
        .filter(|m| only.is_none_or(|i| i == m.index))
        .filter_map(|m| m.mesh.as_ref().ok().map(|mesh| (m.index, mesh)))
        .collect();

    if meshes.is_empty() {
        match only {
            Some(index) => bail!("Mesh {index} is missing or failed to decode"),
            None => bail!("No mesh decoded successfully"),
        }
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, &meshes)?;
    writer.flush()?;
    Ok(meshes.len())
}

/// Write meshes as OBJ objects sharing one index space
pub(crate) fn write_obj<W: Write>(out: &mut W, meshes: &[(usize, &SkinnedMesh)]) -> io::Result<()> {
    writeln!(out, "# snowblind-rs OBJ export")?;
    let mut base = 1usize;
    for (index, mesh) in meshes {
        writeln!(out, "o mesh_{index}")?;
        for p in &mesh.positions {
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for uv in &mesh.uvs {
            let uv = uv.unwrap_or_default();
            writeln!(out, "vt {} {}", uv.x, uv.y)?;
        }
        for n in &mesh.normals {
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for triangle in &mesh.triangles {
            let [a, b, c] = triangle.map(|i| i as usize + base);
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
        base += mesh.vertex_count();
    }
    Ok(())
}
