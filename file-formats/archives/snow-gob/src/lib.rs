//! # snow_gob - Snowblind container directories
//!
//! Readers for the GOB container and the LMP lumps nested inside it. Both
//! formats are plain directories: parsing only builds a name to
//! [`ByteRegion`] map over the caller's buffer, and entries are decoded by
//! the format crates (`snow-tex`, `snow-vif`, `snow-anm`).
//!
//! ## Examples
//!
//! ```no_run
//! use snow_gob::{ArchiveDirectory, GobArchive, LmpArchive};
//!
//! # fn main() -> Result<(), snow_gob::Error> {
//! let data = std::fs::read("CELLAR1.GOB").expect("read gob");
//! let gob = GobArchive::parse(&data)?;
//! let lump = LmpArchive::parse(gob.require_entry("barrel.lmp")?)?;
//! for name in lump.entry_names() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod directory;
pub mod error;
pub mod gob;
pub mod lmp;

pub use directory::{ArchiveDirectory, Directory};
pub use error::{Error, Result};
pub use gob::{GOB_NAME_SIZE, GOB_RECORD_SIZE, GobArchive};
pub use lmp::{LMP_HEADER_SIZE, LMP_NAME_SIZE, LmpArchive};
pub use snow_data::ByteRegion;
