//! Layout detection from the leading GIF tag

use snow_data::{ByteRegion, GifTag};

use crate::error::Result;

/// Offset of the GIF tag whose loop count selects the layout
pub const LEADING_TAG_OFFSET: usize = 0x80;

/// Texture layouts, resolved once from the leading tag's loop count.
///
/// The loop count is a structural heuristic rather than a version field: the
/// paletted upload needs four register writes before its palette, the
/// truecolor upload three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TextureLayout {
    /// CLUT upload followed by GS-swizzled index blocks
    PalettedSwizzled,
    /// RGBA quads stored linearly
    DirectTruecolor,
    /// Any other loop count
    Unsupported {
        /// Loop count of the leading tag
        loop_count: u16,
    },
}

impl TextureLayout {
    /// Classify the texture in `region`
    pub fn detect(region: &ByteRegion<'_>) -> Result<Self> {
        let tag = GifTag::parse(region, LEADING_TAG_OFFSET)?;
        log::trace!("Leading tag: {tag}");
        Ok(Self::from_loop_count(tag.loop_count))
    }

    /// Layout selected by a leading loop count
    pub fn from_loop_count(loop_count: u16) -> Self {
        match loop_count {
            4 => Self::PalettedSwizzled,
            3 => Self::DirectTruecolor,
            _ => Self::Unsupported { loop_count },
        }
    }

    /// Whether the decoder can handle this layout
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }
}
