//! Locating assets on the command line
//!
//! Commands that read an asset accept a `.gob` (with `--lump` picking the
//! nested archive), a bare `.lmp`, or the raw asset file. Inside a lump the
//! entry is picked with `--entry`, or by extension when the lump holds
//! exactly one asset of the wanted kind.

use anyhow::{Context, Result, bail};
use snow_gob::{ArchiveDirectory, ByteRegion, GobArchive, LmpArchive};
use std::fs;
use std::path::Path;

/// Kind of a file or archive entry, judged by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Gob,
    Lump,
    Texture,
    Mesh,
    Animation,
    Other,
}

impl AssetKind {
    /// Classify a file or entry name
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("gob") => Self::Gob,
            Some("lmp") => Self::Lump,
            Some("tex") => Self::Texture,
            Some("vif") => Self::Mesh,
            Some("anm") => Self::Animation,
            _ => Self::Other,
        }
    }

    /// Conventional extension of this kind
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gob => "gob",
            Self::Lump => "lmp",
            Self::Texture => "tex",
            Self::Mesh => "vif",
            Self::Animation => "anm",
            Self::Other => "bin",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Gob => "archive",
            Self::Lump => "lump",
            Self::Texture => "texture",
            Self::Mesh => "mesh",
            Self::Animation => "animation",
            Self::Other => "data",
        }
    }
}

/// Read a whole file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Parse a GOB archive held in `data`
pub fn open_gob<'a>(path: &Path, data: &'a [u8]) -> Result<GobArchive<'a>> {
    GobArchive::parse(data)
        .with_context(|| format!("Failed to parse GOB archive: {}", path.display()))
}

/// Open the lump a command should look in.
///
/// For a GOB, `lump` names the nested archive; it may be omitted when the
/// GOB holds a single lump.
pub fn open_lump<'a>(path: &Path, data: &'a [u8], lump: Option<&str>) -> Result<LmpArchive<'a>> {
    match AssetKind::from_name(&path.to_string_lossy()) {
        AssetKind::Gob => {
            let gob = open_gob(path, data)?;
            let name = match lump {
                Some(name) => name.to_string(),
                None => only_entry(&gob)?,
            };
            let region = gob.require_entry(&name)?;
            LmpArchive::parse(region).with_context(|| format!("Failed to parse lump: {name}"))
        }
        _ if lump.is_some() => bail!("--lump only applies to .gob files"),
        AssetKind::Lump => LmpArchive::from_bytes(data)
            .with_context(|| format!("Failed to parse lump: {}", path.display())),
        _ => bail!("Not a .gob or .lmp file: {}", path.display()),
    }
}

/// Region of the asset of `kind` named on the command line, with its name
pub fn resolve_asset<'a>(
    path: &Path,
    data: &'a [u8],
    lump: Option<&str>,
    entry: Option<&str>,
    kind: AssetKind,
) -> Result<(String, ByteRegion<'a>)> {
    match AssetKind::from_name(&path.to_string_lossy()) {
        AssetKind::Gob | AssetKind::Lump => {
            let lmp = open_lump(path, data, lump)?;
            let name = match entry {
                Some(name) => name.to_string(),
                None => pick_entry(&lmp, kind)?,
            };
            let region = lmp.require_entry(&name)?;
            log::debug!("Using {name} ({} bytes)", region.len());
            Ok((name, region))
        }
        _ => {
            if lump.is_some() || entry.is_some() {
                bail!("--lump and --entry only apply to .gob and .lmp files");
            }
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok((name, ByteRegion::whole(data)))
        }
    }
}

/// The single entry of `kind` in a lump
pub fn pick_entry(lmp: &LmpArchive<'_>, kind: AssetKind) -> Result<String> {
    let names = lmp.entry_names();
    let mut matching = names
        .iter()
        .filter(|name| AssetKind::from_name(name) == kind);
    match (matching.next(), matching.next()) {
        (Some(name), None) => Ok((*name).to_string()),
        (Some(_), Some(_)) => bail!(
            "Lump holds several {} entries, pick one with --entry",
            kind.label()
        ),
        (None, _) => bail!("Lump holds no {} entry", kind.label()),
    }
}

fn only_entry(gob: &GobArchive<'_>) -> Result<String> {
    match gob.entry_names().as_slice() {
        [name] => Ok((*name).to_string()),
        [] => bail!("GOB archive is empty"),
        names => bail!(
            "GOB holds {} lumps, pick one with --lump (first: {})",
            names.len(),
            names[0]
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{gob, lump};
    use super::*;

    #[test]
    fn test_asset_kind_from_name() {
        assert_eq!(AssetKind::from_name("HERO.VIF"), AssetKind::Mesh);
        assert_eq!(AssetKind::from_name("hero.anm"), AssetKind::Animation);
        assert_eq!(AssetKind::from_name("readme"), AssetKind::Other);
    }

    #[test]
    fn test_resolve_by_extension() {
        let data = lump(&[("hero.tex", &[1, 2]), ("hero.vif", &[3, 4, 5])]);
        let (name, region) = resolve_asset(
            Path::new("hero.lmp"),
            &data,
            None,
            None,
            AssetKind::Mesh,
        )
        .unwrap();
        assert_eq!(name, "hero.vif");
        assert_eq!(region.as_slice(), [3, 4, 5]);
    }

    #[test]
    fn test_resolve_through_gob() {
        let inner = lump(&[("a.anm", &[9])]);
        let data = gob(&[("a.lmp", inner)]);
        let (name, region) = resolve_asset(
            Path::new("world.gob"),
            &data,
            None,
            None,
            AssetKind::Animation,
        )
        .unwrap();
        assert_eq!(name, "a.anm");
        assert_eq!(region.as_slice(), [9]);
    }

    #[test]
    fn test_ambiguous_entry_needs_name() {
        let data = lump(&[("a.tex", &[0]), ("b.tex", &[0])]);
        let err = resolve_asset(Path::new("x.lmp"), &data, None, None, AssetKind::Texture)
            .unwrap_err();
        assert!(err.to_string().contains("--entry"));
    }

    #[test]
    fn test_raw_file_is_whole_region() {
        let data = [1u8, 2, 3];
        let (name, region) =
            resolve_asset(Path::new("dir/raw.tex"), &data, None, None, AssetKind::Texture)
                .unwrap();
        assert_eq!(name, "raw.tex");
        assert_eq!(region.len(), 3);
        assert!(
            resolve_asset(Path::new("raw.tex"), &data, Some("x.lmp"), None, AssetKind::Texture)
                .is_err()
        );
    }
}
