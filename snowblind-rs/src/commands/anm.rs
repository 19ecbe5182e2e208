//! Animation command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
#[cfg(feature = "serde")]
use std::path::{Path, PathBuf};

use snow_anm::{AnimationClip, decode_animation};

use super::AssetArgs;
use crate::utils::{AssetKind, add_table_row, create_table, read_file};

#[derive(Subcommand)]
pub enum AnmCommands {
    /// Display the header and skeleton of an animation
    Info {
        #[command(flatten)]
        asset: AssetArgs,

        /// Also list the world transform of bone 0 at every frame
        #[arg(long)]
        frames: bool,
    },

    /// Dump every decoded pose to JSON
    #[cfg(feature = "serde")]
    Dump {
        #[command(flatten)]
        asset: AssetArgs,

        /// Output JSON path
        output: PathBuf,

        /// Include world transforms next to the local poses
        #[arg(long)]
        world: bool,
    },
}

pub fn execute(command: AnmCommands) -> Result<()> {
    match command {
        AnmCommands::Info { asset, frames } => show_info(&asset, frames),
        #[cfg(feature = "serde")]
        AnmCommands::Dump {
            asset,
            output,
            world,
        } => dump(&asset, &output, world),
    }
}

/// Decode the selected animation, returning its entry name
pub(crate) fn load_clip(asset: &AssetArgs) -> Result<(String, AnimationClip)> {
    let data = read_file(&asset.file)?;
    let (entry, region) = asset.resolve(&data, AssetKind::Animation)?;
    let clip = decode_animation(&region).with_context(|| format!("Failed to decode {entry}"))?;
    Ok((entry, clip))
}

fn show_info(asset: &AssetArgs, frames: bool) -> Result<()> {
    let (entry, clip) = load_clip(asset)?;
    let header = clip.header();

    println!("{}", style("Animation Information").bold().cyan());
    println!("{}", style("=====================").cyan());
    println!("{}: {}", style("Entry").bold(), entry);
    println!("{}: {}", style("Bones").bold(), clip.num_bones());
    println!("{}: {}", style("Frames").bold(), clip.num_frames());
    println!(
        "{}: base pose {:#x}, binding pose {:#x}, skeleton {:#x}",
        style("Tables").bold(),
        header.base_pose_offset,
        header.binding_pose_offset,
        header.skeleton_offset
    );
    println!(
        "{}: {:#010x} {:#010x} {:#010x}",
        style("Unknown words").dim(),
        header.unknown_04,
        header.unknown_14,
        header.unknown_18
    );
    println!();

    let skeleton = clip.skeleton();
    let mut table = create_table(&["Bone", "Depth", "Parent", "Children", "Binding offset"]);
    for bone in 0..skeleton.len() {
        let binding = clip
            .binding_pose()
            .get(bone)
            .map_or_else(String::new, |p| format!("{:.3} {:.3} {:.3}", p.x, p.y, p.z));
        add_table_row(
            &mut table,
            [
                bone.to_string(),
                skeleton.level(bone).unwrap_or_default().to_string(),
                skeleton
                    .parent(bone)
                    .map_or_else(|| "root".to_string(), |p| p.to_string()),
                skeleton.children(bone).count().to_string(),
                binding,
            ],
        );
    }
    table.printstd();

    if frames && clip.num_bones() > 0 {
        println!();
        println!("{}", style("Bone 0 world transform").bold());
        let mut table = create_table(&["Frame", "Position", "Rotation (x y z w)"]);
        for frame in 0..clip.num_frames() {
            if let Some(pose) = clip.world_pose(frame, 0) {
                let (p, r) = (pose.position, pose.rotation);
                add_table_row(
                    &mut table,
                    [
                        frame.to_string(),
                        format!("{:.3} {:.3} {:.3}", p.x, p.y, p.z),
                        format!("{:.4} {:.4} {:.4} {:.4}", r.x, r.y, r.z, r.w),
                    ],
                );
            }
        }
        table.printstd();
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct AnimationDump<'a> {
    entry: &'a str,
    clip: &'a AnimationClip,
    #[serde(skip_serializing_if = "Option::is_none")]
    world: Option<Vec<&'a [snow_anm::AnimPose]>>,
}

#[cfg(feature = "serde")]
fn dump(asset: &AssetArgs, output: &Path, world: bool) -> Result<()> {
    let (entry, clip) = load_clip(asset)?;
    save_json(&entry, &clip, world, output)?;
    println!(
        "{} Dumped {} frames of {} to {}",
        style("✓").green(),
        clip.num_frames(),
        entry,
        output.display()
    );
    Ok(())
}

/// Write the clip's poses as pretty JSON
#[cfg(feature = "serde")]
pub(crate) fn save_json(entry: &str, clip: &AnimationClip, world: bool, output: &Path) -> Result<()> {
    let world = world.then(|| {
        (0..clip.num_frames())
            .filter_map(|frame| clip.world_poses(frame))
            .collect()
    });
    let dump = AnimationDump {
        entry,
        clip,
        world,
    };
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create file: {}", output.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &dump)
        .with_context(|| format!("Failed to write {}", output.display()))
}
