//! Command implementations for each file format

#[cfg(feature = "gob")]
pub mod gob;

#[cfg(feature = "gob")]
pub mod lmp;

#[cfg(feature = "tex")]
pub mod tex;

#[cfg(feature = "vif")]
pub mod vif;

#[cfg(feature = "anm")]
pub mod anm;

#[cfg(all(feature = "tex", feature = "vif", feature = "anm"))]
pub mod model;

#[cfg(any(feature = "tex", feature = "vif", feature = "anm"))]
mod asset {
    use anyhow::Result;
    use clap::Args;
    use snow_gob::ByteRegion;
    use std::path::PathBuf;

    use crate::utils::{AssetKind, resolve_asset};

    /// Where to find one asset
    #[derive(Args, Debug, Clone)]
    pub struct AssetArgs {
        /// A .gob archive, a .lmp lump, or the raw asset file
        pub file: PathBuf,

        /// Lump to look in when FILE is a GOB archive
        #[arg(short, long)]
        pub lump: Option<String>,

        /// Entry to read inside the lump (picked by extension if omitted)
        #[arg(short, long)]
        pub entry: Option<String>,
    }

    impl AssetArgs {
        /// Region of the selected asset of `kind`, with its name
        pub fn resolve<'a>(
            &self,
            data: &'a [u8],
            kind: AssetKind,
        ) -> Result<(String, ByteRegion<'a>)> {
            resolve_asset(
                &self.file,
                data,
                self.lump.as_deref(),
                self.entry.as_deref(),
                kind,
            )
        }
    }
}

#[cfg(any(feature = "tex", feature = "vif", feature = "anm"))]
pub use asset::AssetArgs;
