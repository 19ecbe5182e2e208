//! Palette entries and CLUT reordering

use snow_data::ByteRegion;

use crate::error::Result;

/// Number of entries in an 8-bit palette
pub const PALETTE_8BPP: usize = 256;

/// Number of entries in a 4-bit palette
pub const PALETTE_4BPP: usize = 16;

/// An RGBA8 colour as stored by the GS.
///
/// Alpha uses the PS2 half range: 0x80 is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha, 0x80 = opaque
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a colour from its components
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read the four bytes at `offset` as R, G, B, A
    pub fn read(region: &ByteRegion<'_>, offset: usize) -> Result<Self> {
        let bytes = region.bytes(offset, 4)?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }

    /// Same colour with alpha rescaled from 0..=0x80 to 0..=0xFF
    pub fn expanded_alpha(self) -> Self {
        let a = (u16::from(self.a) * 255 / 0x80).min(255) as u8;
        Self { a, ..self }
    }

    /// Components as an array
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Read `width * height` palette entries starting at `offset`
pub fn read_palette(
    region: &ByteRegion<'_>,
    offset: usize,
    width: usize,
    height: usize,
) -> Result<Vec<Rgba>> {
    (0..width * height)
        .map(|i| Rgba::read(region, offset + i * 4))
        .collect()
}

/// Convert a 256 entry palette from CSM1 storage order to index order.
///
/// CSM1 stores each run of 32 colours with the second and third groups of
/// eight swapped. Other palette sizes are stored linearly and come back
/// unchanged.
pub fn unswizzle_palette(palette: Vec<Rgba>) -> Vec<Rgba> {
    if palette.len() != PALETTE_8BPP {
        return palette;
    }
    let mut ordered = palette.clone();
    for (dest, src) in ordered.chunks_exact_mut(32).zip(palette.chunks_exact(32)) {
        dest[..8].copy_from_slice(&src[..8]);
        dest[8..16].copy_from_slice(&src[16..24]);
        dest[16..24].copy_from_slice(&src[8..16]);
        dest[24..].copy_from_slice(&src[24..]);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn ramp(len: usize) -> Vec<Rgba> {
        (0..len).map(|i| Rgba::new(i as u8, 0, 0, 0x80)).collect()
    }

    #[test_case(0, 0)]
    #[test_case(7, 7)]
    #[test_case(8, 16)]
    #[test_case(15, 23)]
    #[test_case(16, 8)]
    #[test_case(23, 15)]
    #[test_case(24, 24)]
    #[test_case(40, 48)]
    #[test_case(255, 255)]
    fn test_csm1_order(index: usize, stored_at: usize) {
        let palette = unswizzle_palette(ramp(256));
        assert_eq!(palette[index].r as usize, stored_at);
    }

    #[test]
    fn test_small_palette_unchanged() {
        assert_eq!(unswizzle_palette(ramp(16)), ramp(16));
    }

    #[test]
    fn test_read_palette() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let palette = read_palette(&ByteRegion::whole(&data), 0, 2, 1).unwrap();
        assert_eq!(palette, [Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)]);
        assert!(read_palette(&ByteRegion::whole(&data), 4, 2, 1).is_err());
    }

    #[test_case(0x80, 0xFF)]
    #[test_case(0x40, 0x7F)]
    #[test_case(0xFF, 0xFF)]
    #[test_case(0, 0)]
    fn test_expanded_alpha(stored: u8, expanded: u8) {
        assert_eq!(Rgba::new(1, 2, 3, stored).expanded_alpha().a, expanded);
    }
}
