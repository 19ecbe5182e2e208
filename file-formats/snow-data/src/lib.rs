//! Shared primitives for the Snowblind engine asset decoders.
//!
//! [`ByteRegion`] is the bounds-checked little-endian window every decoder
//! reads through, and [`GifTag`] is the PS2 GIF descriptor that both the
//! texture and the geometry formats embed.
//!
//! ```
//! use snow_data::ByteRegion;
//!
//! let data = [0x34, 0x12, 0x00, 0x00];
//! let region = ByteRegion::whole(&data);
//! assert_eq!(region.get_le_ushort(0).unwrap(), 0x1234);
//! assert!(region.get_le_int(2).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod error;
pub mod gif_tag;
pub mod region;

pub use error::{Result, SnowDataError};
pub use gif_tag::{GIF_TAG_SIZE, GifFormat, GifTag, PRIM_TRIANGLE_STRIP};
pub use region::ByteRegion;
