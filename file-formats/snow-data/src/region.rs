//! Bounds-checked little-endian view over a slice of a loaded buffer

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, SnowDataError};

/// Immutable window `[start, start + len)` into a backing buffer.
///
/// Every accessor takes an offset relative to `start` and fails with
/// [`SnowDataError::OutOfRange`] when the read does not fit inside the
/// window. Reads never wrap and never spill into neighbouring data even when
/// the backing buffer is larger than the region.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ByteRegion<'a> {
    data: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> ByteRegion<'a> {
    /// Create a region of `len` bytes starting at `start` in `data`
    pub fn new(data: &'a [u8], start: usize, len: usize) -> Result<Self> {
        match start.checked_add(len) {
            Some(end) if end <= data.len() => Ok(Self { data, start, len }),
            _ => Err(SnowDataError::out_of_range(start, len, data.len())),
        }
    }

    /// Region covering the whole buffer
    pub fn whole(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            len: data.len(),
        }
    }

    /// Region running from `start` to the end of the buffer
    pub fn tail(data: &'a [u8], start: usize) -> Result<Self> {
        if start > data.len() {
            return Err(SnowDataError::out_of_range(start, 0, data.len()));
        }
        Ok(Self {
            data,
            start,
            len: data.len() - start,
        })
    }

    /// Offset of the region inside the backing buffer
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length of the region in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The backing buffer the region points into
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// The bytes covered by the region
    pub fn as_slice(&self) -> &'a [u8] {
        &self.data[self.start..self.start + self.len]
    }

    fn check(&self, offset: usize, size: usize) -> Result<usize> {
        match offset.checked_add(size) {
            Some(end) if end <= self.len => Ok(self.start + offset),
            _ => Err(SnowDataError::out_of_range(offset, size, self.len)),
        }
    }

    /// Signed byte at `offset`
    pub fn get_byte(&self, offset: usize) -> Result<i8> {
        let pos = self.check(offset, 1)?;
        Ok(self.data[pos] as i8)
    }

    /// Unsigned byte at `offset`
    pub fn get_unsigned_byte(&self, offset: usize) -> Result<u8> {
        let pos = self.check(offset, 1)?;
        Ok(self.data[pos])
    }

    /// Signed little-endian 16-bit value at `offset`
    pub fn get_le_short(&self, offset: usize) -> Result<i16> {
        let pos = self.check(offset, 2)?;
        Ok(LittleEndian::read_i16(&self.data[pos..pos + 2]))
    }

    /// Unsigned little-endian 16-bit value at `offset`
    pub fn get_le_ushort(&self, offset: usize) -> Result<u16> {
        let pos = self.check(offset, 2)?;
        Ok(LittleEndian::read_u16(&self.data[pos..pos + 2]))
    }

    /// Signed little-endian 32-bit value at `offset`
    pub fn get_le_int(&self, offset: usize) -> Result<i32> {
        let pos = self.check(offset, 4)?;
        Ok(LittleEndian::read_i32(&self.data[pos..pos + 4]))
    }

    /// Unsigned little-endian 32-bit value at `offset`
    pub fn get_le_uint(&self, offset: usize) -> Result<u32> {
        let pos = self.check(offset, 4)?;
        Ok(LittleEndian::read_u32(&self.data[pos..pos + 4]))
    }

    /// Unsigned little-endian 64-bit value at `offset`
    pub fn get_le_ulong(&self, offset: usize) -> Result<u64> {
        let pos = self.check(offset, 8)?;
        Ok(LittleEndian::read_u64(&self.data[pos..pos + 8]))
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let pos = self.check(offset, len)?;
        Ok(&self.data[pos..pos + len])
    }

    /// Narrow the view to `len` bytes starting at `offset`
    pub fn sub_region(&self, offset: usize, len: usize) -> Result<ByteRegion<'a>> {
        let pos = self.check(offset, len)?;
        Ok(Self {
            data: self.data,
            start: pos,
            len,
        })
    }

    /// Read a NUL-terminated name of at most `max_len` bytes at `offset`.
    ///
    /// The field may be shorter than `max_len` when it sits at the very end of
    /// the region, but at least one byte must be readable.
    pub fn c_string(&self, offset: usize, max_len: usize) -> Result<String> {
        let available = self.len.saturating_sub(offset).min(max_len);
        let field = self.bytes(offset, available.max(1))?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        Ok(String::from_utf8_lossy(&field[..end]).into_owned())
    }
}

impl fmt::Debug for ByteRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRegion")
            .field("start", &format_args!("{:#x}", self.start))
            .field("len", &format_args!("{:#x}", self.len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DATA: [u8; 8] = [0x01, 0xFF, 0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF];

    #[test]
    fn test_reads_are_relative_to_start() {
        let region = ByteRegion::new(&DATA, 2, 6).unwrap();
        assert_eq!(region.get_le_ushort(0).unwrap(), 0x1234);
        assert_eq!(region.get_le_int(2).unwrap(), -2);
        assert_eq!(region.get_unsigned_byte(2).unwrap(), 0xFE);
        assert_eq!(region.get_byte(2).unwrap(), -2);
    }

    #[test]
    fn test_signed_and_unsigned_views() {
        let region = ByteRegion::whole(&DATA);
        assert_eq!(region.get_byte(1).unwrap(), -1);
        assert_eq!(region.get_unsigned_byte(1).unwrap(), 0xFF);
        assert_eq!(region.get_le_short(4).unwrap(), -2);
        assert_eq!(region.get_le_ushort(4).unwrap(), 0xFFFE);
    }

    #[test]
    fn test_reads_past_region_fail_even_inside_buffer() {
        let region = ByteRegion::new(&DATA, 0, 4).unwrap();
        assert_eq!(
            region.get_le_int(2),
            Err(SnowDataError::OutOfRange {
                offset: 2,
                size: 4,
                len: 4
            })
        );
        assert!(region.get_unsigned_byte(4).is_err());
        assert!(region.get_le_int(usize::MAX).is_err());
    }

    #[test]
    fn test_region_must_fit_buffer() {
        assert!(ByteRegion::new(&DATA, 4, 5).is_err());
        assert!(ByteRegion::new(&DATA, usize::MAX, 2).is_err());
        assert!(ByteRegion::tail(&DATA, 9).is_err());
        assert_eq!(ByteRegion::tail(&DATA, 8).unwrap().len(), 0);
    }

    #[test]
    fn test_sub_region_and_bytes() {
        let region = ByteRegion::new(&DATA, 1, 6).unwrap();
        let sub = region.sub_region(1, 2).unwrap();
        assert_eq!(sub.start(), 2);
        assert_eq!(sub.as_slice(), &[0x34, 0x12]);
        assert_eq!(region.bytes(0, 2).unwrap(), &[0xFF, 0x34]);
        assert!(region.sub_region(5, 2).is_err());
    }

    #[test]
    fn test_c_string() {
        let mut data = [0u8; 16];
        data[..5].copy_from_slice(b"a.lmp");
        let region = ByteRegion::whole(&data);
        assert_eq!(region.c_string(0, 8).unwrap(), "a.lmp");
        assert_eq!(region.c_string(8, 8).unwrap(), "");
        // Name field running into the end of the region
        let region = ByteRegion::new(&data, 0, 3).unwrap();
        assert_eq!(region.c_string(0, 8).unwrap(), "a.l");
        assert!(region.c_string(3, 8).is_err());
    }

    #[test]
    fn test_debug_hides_buffer() {
        let region = ByteRegion::new(&DATA, 2, 4).unwrap();
        assert_eq!(format!("{region:?}"), "ByteRegion { start: 0x2, len: 0x4 }");
    }
}
