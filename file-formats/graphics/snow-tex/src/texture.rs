//! Decoded texture

use image::RgbaImage;

use crate::palette::Rgba;

/// A decoded texture.
///
/// Each texel is `None` until the file writes it. Unset texels are "no data",
/// not black, and are only given a colour when exporting with
/// [`Texture::to_rgba8`] or [`Texture::to_image`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgba>>,
}

impl Texture {
    /// Texture with no texels, returned for unsupported layouts
    pub fn empty() -> Self {
        Self::default()
    }

    /// Texture of the given size with every texel unset
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        }
    }

    /// Width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the texture has no texels at all
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Texel at `(x, y)`, `None` when unset or outside the texture
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[self.index(x, y)]
    }

    /// All texels in row-major order
    pub fn pixels(&self) -> &[Option<Rgba>] {
        &self.pixels
    }

    /// Number of texels the file actually wrote
    pub fn written_texels(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, texel: Option<Rgba>) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = texel;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Flatten to RGBA8 bytes, painting unset texels with `fill`
    pub fn to_rgba8(&self, fill: Rgba) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.unwrap_or(fill).to_array())
            .collect()
    }

    /// Convert to an [`image::RgbaImage`], painting unset texels with `fill`
    pub fn to_image(&self, fill: Rgba) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y).unwrap_or(fill).to_array())
        })
    }

    /// Copy with every written texel's alpha expanded to the 0..=255 range
    pub fn with_expanded_alpha(&self) -> Self {
        Self {
            pixels: self
                .pixels
                .iter()
                .map(|p| p.map(Rgba::expanded_alpha))
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unset_is_not_black() {
        let mut texture = Texture::new(2, 1);
        texture.set(0, 0, Some(Rgba::new(0, 0, 0, 0x80)));

        assert_eq!(texture.pixel(0, 0), Some(Rgba::new(0, 0, 0, 0x80)));
        assert_eq!(texture.pixel(1, 0), None);
        assert_eq!(texture.pixel(2, 0), None);
        assert_eq!(texture.written_texels(), 1);
    }

    #[test]
    fn test_fill_on_export() {
        let mut texture = Texture::new(2, 1);
        texture.set(1, 0, Some(Rgba::new(1, 2, 3, 0x80)));
        let fill = Rgba::new(0xFF, 0, 0xFF, 0xFF);

        assert_eq!(texture.to_rgba8(fill), [0xFF, 0, 0xFF, 0xFF, 1, 2, 3, 0x80]);
        let image = texture.to_image(fill);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [1, 2, 3, 0x80]);
    }

    #[test]
    fn test_expanded_alpha_keeps_unset() {
        let mut texture = Texture::new(2, 1);
        texture.set(0, 0, Some(Rgba::new(1, 2, 3, 0x80)));
        let expanded = texture.with_expanded_alpha();

        assert_eq!(expanded.pixel(0, 0), Some(Rgba::new(1, 2, 3, 0xFF)));
        assert_eq!(expanded.pixel(1, 0), None);
    }
}
