#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod decoder;
pub mod error;
pub mod layout;
pub mod palette;
pub mod swizzle;
pub mod texture;

pub use decoder::{MAX_DIMENSION, decode_texture, try_decode_texture};
pub use error::{Error, Result};
pub use layout::TextureLayout;
pub use palette::{Rgba, read_palette, unswizzle_palette};
pub use swizzle::unswizzle_8bpp;
pub use texture::Texture;
