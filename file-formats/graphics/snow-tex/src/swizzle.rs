//! GS memory un-swizzling
//!
//! 8-bit textures are uploaded as PSMCT32 words, so the indices arrive in the
//! PSMT8 block/column layout of GS local memory. [`unswizzle_8bpp`] applies
//! the inverse address transform to recover linear order.

/// Source index of linear texel `(x, y)` in a swizzled PSMT8 buffer of
/// width `w`
pub fn swizzled_index(x: usize, y: usize, w: usize) -> usize {
    let block_location = (y & !0xF) * w + (x & !0xF) * 2;
    let swap_selector = (((y + 2) >> 2) & 0x1) * 4;
    let pos_y = (((y & !3) >> 1) + (y & 1)) & 0x7;
    let column_location = pos_y * w * 2 + ((x + swap_selector) & 0x7) * 4;
    let byte_num = ((y >> 1) & 1) + ((x >> 2) & 2);

    block_location + column_location + byte_num
}

/// Reorder a `w` x `h` swizzled buffer into linear order.
///
/// Texels whose source index falls outside `pixels` are left unset; the
/// number of such gaps is returned alongside the reordered buffer.
pub fn unswizzle_8bpp<T: Copy>(pixels: &[Option<T>], w: usize, h: usize) -> (Vec<Option<T>>, usize) {
    let mut unswizzled = vec![None; pixels.len()];
    let mut skipped = 0;

    for y in 0..h {
        for x in 0..w {
            let dest = y * w + x;
            let src = swizzled_index(x, y, w);
            match (pixels.get(src), unswizzled.get_mut(dest)) {
                (Some(texel), Some(slot)) => *slot = *texel,
                _ => {
                    log::trace!("Swizzle gap at ({x}, {y}): source index {src}");
                    skipped += 1;
                }
            }
        }
    }

    if skipped > 0 {
        log::debug!("Un-swizzle of {w}x{h} left {skipped} texels unset");
    }
    (unswizzled, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0, 0, 0)]
    #[test_case(1, 0, 4)]
    #[test_case(4, 0, 16)]
    #[test_case(8, 0, 2)]
    #[test_case(0, 1, 32)]
    #[test_case(0, 2, 17)]
    #[test_case(15, 15, 255)]
    fn test_index_16x16(x: usize, y: usize, expected: usize) {
        assert_eq!(swizzled_index(x, y, 16), expected);
    }

    #[test]
    fn test_full_block_is_a_permutation() {
        let source: Vec<Option<u16>> = (0..256).map(Some).collect();
        let (linear, skipped) = unswizzle_8bpp(&source, 16, 16);
        assert_eq!(skipped, 0);

        let mut seen: Vec<u16> = linear.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..256).collect::<Vec<_>>());
    }

    #[test_case(16, 16)]
    #[test_case(32, 16)]
    #[test_case(48, 80)]
    #[test_case(256, 256)]
    fn test_padded_sizes_stay_in_buffer(w: usize, h: usize) {
        let source: Vec<Option<usize>> = (0..w * h).map(Some).collect();
        let (linear, skipped) = unswizzle_8bpp(&source, w, h);
        assert_eq!(skipped, 0);
        assert!(linear.iter().all(Option::is_some));
    }

    #[test]
    fn test_short_buffer_leaves_gaps() {
        let source: Vec<Option<u8>> = vec![Some(1); 200];
        let (linear, skipped) = unswizzle_8bpp(&source, 16, 16);
        assert!(skipped > 0);
        assert_eq!(linear.len(), 200);
        assert!(linear.iter().any(Option::is_none));
    }
}
