//! Texture decoding
//!
//! Paletted textures are laid out as follows (offsets from the start of the
//! texture):
//!
//! | Offset         | Content                                            |
//! |----------------|----------------------------------------------------|
//! | 0x00           | final width, final height                          |
//! | 0x80           | leading GIF tag (NLOOP = 4)                        |
//! | 0xB0 / 0xB4    | palette width / height                             |
//! | 0xD0           | palette GIF tag, RGBA entries from 0xE0            |
//! | after palette  | image GIF tag (0x20 bytes)                         |
//! | then, repeated | 0x50 byte block header, `w * h` 32-bit words       |
//!
//! Each block header holds the transfer rectangle: width at +0x10, height at
//! +0x14, destination x at +0x24 and y at +0x26.
//!
//! Index data is written into a working buffer whose half-dimensions are
//! padded to a multiple of eight. 8-bit textures are then un-swizzled at
//! twice those dimensions; 4-bit textures are used as they are.

use snow_data::{ByteRegion, GIF_TAG_SIZE, GifFormat, GifTag};

use crate::error::{Error, Result};
use crate::layout::{LEADING_TAG_OFFSET, TextureLayout};
use crate::palette::{PALETTE_4BPP, PALETTE_8BPP, Rgba, read_palette, unswizzle_palette};
use crate::swizzle::unswizzle_8bpp;
use crate::texture::Texture;

const PALETTE_WIDTH_OFFSET: usize = LEADING_TAG_OFFSET + 0x30;
const PALETTE_HEIGHT_OFFSET: usize = LEADING_TAG_OFFSET + 0x34;
const PALETTE_TAG_OFFSET: usize = LEADING_TAG_OFFSET + 0x50;
const IMAGE_TAG_SIZE: usize = 0x20;
const BLOCK_HEADER_SIZE: usize = 0x50;

const TRUECOLOR_TAG_OFFSET: usize = 0xC0;
const TRUECOLOR_DATA_OFFSET: usize = 0xD0;

/// Largest width or height the GS can address (TW/TH of 10)
pub const MAX_DIMENSION: usize = 1024;

/// Decode the texture in `region`.
///
/// Unsupported layouts are logged and produce [`Texture::empty`]; only
/// truncated data is reported as an error.
pub fn decode_texture(region: &ByteRegion<'_>) -> Result<Texture> {
    match try_decode_texture(region) {
        Err(err) if err.is_unsupported() => {
            log::warn!("Skipping texture: {err}");
            Ok(Texture::empty())
        }
        other => other,
    }
}

/// Decode the texture in `region`, reporting unsupported layouts as
/// [`Error::UnsupportedFormat`]
pub fn try_decode_texture(region: &ByteRegion<'_>) -> Result<Texture> {
    let width = region.get_le_ushort(0)? as usize;
    let height = region.get_le_ushort(2)? as usize;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::unsupported(format!("{width}x{height} exceeds {MAX_DIMENSION}")));
    }

    let source = match TextureLayout::detect(region)? {
        TextureLayout::PalettedSwizzled => decode_paletted(region, width, height)?,
        TextureLayout::DirectTruecolor => decode_truecolor(region, width, height)?,
        TextureLayout::Unsupported { loop_count } => {
            return Err(Error::unsupported(format!(
                "leading GIF tag loop count {loop_count}"
            )));
        }
    };

    let texture = compose(width, height, source);
    log::debug!(
        "Decoded {}x{} texture, {} texels written",
        texture.width(),
        texture.height(),
        texture.written_texels()
    );
    Ok(texture)
}

/// Width of the palette indices in a paletted texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexWidth {
    Eight,
    Four,
}

/// Decoded texels before cropping to the final size
struct SourceImage {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgba>>,
}

/// Transfer rectangle of one image block
#[derive(Debug, Clone, Copy)]
struct ImageBlock {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl ImageBlock {
    fn parse(region: &ByteRegion<'_>, offset: usize) -> Result<Self> {
        let tag = GifTag::parse(region, offset)?;
        let block = Self {
            width: region.get_le_ushort(offset + 0x10)? as usize,
            height: region.get_le_ushort(offset + 0x14)? as usize,
            x: region.get_le_ushort(offset + 0x24)? as usize,
            y: region.get_le_ushort(offset + 0x26)? as usize,
        };
        log::trace!("Image block at {offset:#x}: {block:?}, {tag}");
        Ok(block)
    }
}

fn decode_paletted(
    region: &ByteRegion<'_>,
    width: usize,
    height: usize,
) -> Result<Option<SourceImage>> {
    let palette_width = region.get_le_ushort(PALETTE_WIDTH_OFFSET)? as usize;
    let palette_height = region.get_le_ushort(PALETTE_HEIGHT_OFFSET)? as usize;
    let index_width = match palette_width * palette_height {
        PALETTE_8BPP => IndexWidth::Eight,
        PALETTE_4BPP => IndexWidth::Four,
        entries => {
            return Err(Error::unsupported(format!(
                "{entries} entry palette ({palette_width}x{palette_height})"
            )));
        }
    };

    let mut offset = PALETTE_TAG_OFFSET;
    let palette_tag = GifTag::parse(region, offset)?;
    log::trace!("Palette tag: {palette_tag}");
    let palette = unswizzle_palette(read_palette(
        region,
        offset + GIF_TAG_SIZE,
        palette_width,
        palette_height,
    )?);
    offset += palette.len() * 4 + GIF_TAG_SIZE;

    let image_tag = GifTag::parse(region, offset)?;
    log::trace!("Image tag: {image_tag}");
    offset += IMAGE_TAG_SIZE;

    let buffer_width = (width / 2 + 7) & !7;
    let buffer_height = (height / 2 + 7) & !7;

    let mut buffer = None;
    let mut blocks = 0;
    while offset + GIF_TAG_SIZE < region.len() {
        let block = ImageBlock::parse(region, offset)?;
        if block.width > MAX_DIMENSION || block.height > MAX_DIMENSION {
            return Err(Error::unsupported(format!(
                "{}x{} image block exceeds {MAX_DIMENSION}",
                block.width, block.height
            )));
        }
        offset += BLOCK_HEADER_SIZE;
        match index_width {
            IndexWidth::Eight => {
                write_8bpp(region, offset, block, &palette, buffer_width, buffer_height, &mut buffer)?;
            }
            IndexWidth::Four => write_4bpp(region, offset, block, &palette, buffer_width, &mut buffer)?,
        }
        offset += block.width * block.height * 4;
        blocks += 1;
    }
    log::debug!("Read {blocks} image blocks, {index_width:?}-bit indices");

    let Some(pixels) = buffer else {
        return Ok(None);
    };
    let source = match index_width {
        IndexWidth::Eight => {
            let (pixels, _) = unswizzle_8bpp(&pixels, buffer_width * 2, buffer_height * 2);
            SourceImage {
                width: buffer_width * 2,
                height: buffer_height * 2,
                pixels,
            }
        }
        IndexWidth::Four => SourceImage {
            width: buffer_width,
            height: buffer_height,
            pixels,
        },
    };
    Ok(Some(source))
}

/// Write a block of 8-bit indices, four per 32-bit word
fn write_8bpp(
    region: &ByteRegion<'_>,
    mut offset: usize,
    block: ImageBlock,
    palette: &[Rgba],
    buffer_width: usize,
    buffer_height: usize,
    buffer: &mut Option<Vec<Option<Rgba>>>,
) -> Result<()> {
    region.bytes(offset, block.width * block.height * 4)?;
    let buffer = buffer.get_or_insert_with(|| vec![None; buffer_width * buffer_height * 4]);
    let row_bytes = buffer_width * 4;

    for y in (0..block.height).take_while(|y| y + block.y < buffer_height) {
        for x in 0..block.width {
            let dest = (y + block.y) * row_bytes + (x + block.x) * 4;
            for (i, &index) in region.bytes(offset, 4)?.iter().enumerate() {
                if let Some(slot) = buffer.get_mut(dest + i) {
                    *slot = palette.get(index as usize).copied();
                }
            }
            offset += 4;
        }
    }
    Ok(())
}

/// Write a block of 4-bit indices, low nibble first
fn write_4bpp(
    region: &ByteRegion<'_>,
    mut offset: usize,
    block: ImageBlock,
    palette: &[Rgba],
    buffer_width: usize,
    buffer: &mut Option<Vec<Option<Rgba>>>,
) -> Result<()> {
    region.bytes(offset, (block.width * block.height).div_ceil(2))?;
    let buffer = buffer.get_or_insert_with(|| vec![None; block.height * buffer_width]);
    let mut high_nibble = false;

    for y in 0..block.height {
        for x in 0..block.width {
            let byte = region.get_unsigned_byte(offset)?;
            let index = if high_nibble {
                offset += 1;
                byte >> 4
            } else {
                byte & 0x0F
            };
            high_nibble = !high_nibble;

            let dest = (y + block.y) * buffer_width + x + block.x;
            if let Some(slot) = buffer.get_mut(dest) {
                *slot = palette.get(index as usize).copied();
            }
        }
    }
    Ok(())
}

fn decode_truecolor(
    region: &ByteRegion<'_>,
    width: usize,
    height: usize,
) -> Result<Option<SourceImage>> {
    let tag = GifTag::parse(region, TRUECOLOR_TAG_OFFSET)?;
    if tag.format != GifFormat::Image {
        log::debug!("Truecolor texture without an IMAGE transfer: {tag}");
        return Ok(None);
    }

    let pixels = (0..width * height)
        .map(|i| Rgba::read(region, TRUECOLOR_DATA_OFFSET + i * 4).map(Some))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(SourceImage {
        width,
        height,
        pixels,
    }))
}

/// Crop the decoded texels to the final size, leaving unwritten texels unset
fn compose(width: usize, height: usize, source: Option<SourceImage>) -> Texture {
    let Some(source) = source.filter(|_| width != 0) else {
        return Texture::empty();
    };

    let mut texture = Texture::new(width as u32, height as u32);
    for y in 0..source.height.min(height) {
        for x in 0..source.width.min(width) {
            let texel = source.pixels.get(y * source.width + x).copied().flatten();
            texture.set(x as u32, y as u32, texel);
        }
    }
    texture
}
