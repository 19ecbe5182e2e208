//! Nested LMP lump
//!
//! A lump starts with a little-endian record count followed by that many
//! fixed 0x40-byte headers:
//!
//! | Offset | Size | Field                             |
//! |--------|------|-----------------------------------|
//! | 0x00   | 0x38 | entry name, NUL padded            |
//! | 0x38   | 4    | data offset from the lump start   |
//! | 0x3C   | 4    | data length                       |

use snow_data::ByteRegion;

use crate::directory::{ArchiveDirectory, Directory};
use crate::error::{Error, Result};

/// Size of one LMP directory header
pub const LMP_HEADER_SIZE: usize = 0x40;

/// Size of the name field at the start of a header
pub const LMP_NAME_SIZE: usize = 0x38;

const OFFSET_FIELD: usize = 0x38;
const LENGTH_FIELD: usize = 0x3C;
const TABLE_START: usize = 4;

/// A parsed lump
#[derive(Debug, Clone)]
pub struct LmpArchive<'a> {
    region: ByteRegion<'a>,
    directory: Directory<'a>,
    table_end: usize,
}

impl<'a> LmpArchive<'a> {
    /// Parse the lump occupying `region`, typically an entry of a GOB
    pub fn parse(region: ByteRegion<'a>) -> Result<Self> {
        let (directory, table_end) = build_directory(&region)?;
        log::debug!(
            "LMP at {:#x} holds {} entries",
            region.start(),
            directory.len()
        );
        Ok(Self {
            region,
            directory,
            table_end,
        })
    }

    /// Parse a standalone lump file
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        Self::parse(ByteRegion::whole(data))
    }

    /// The region the lump was parsed from
    pub fn region(&self) -> ByteRegion<'a> {
        self.region
    }

    /// Bytes from the lump start to the end of its header table or its last
    /// entry, whichever is further.
    ///
    /// GOB records carry no length, so this is what bounds a lump copied out
    /// of its archive.
    pub fn extent(&self) -> usize {
        let base = self.region.start();
        self.directory
            .iter()
            .map(|(_, entry)| entry.start() - base + entry.len())
            .fold(self.table_end, usize::max)
    }
}

impl<'a> ArchiveDirectory<'a> for LmpArchive<'a> {
    fn directory(&self) -> &Directory<'a> {
        &self.directory
    }
}

fn build_directory<'a>(region: &ByteRegion<'a>) -> Result<(Directory<'a>, usize)> {
    let count = region.get_le_uint(0)? as usize;

    // Reject counts whose header table cannot fit before trusting them as a
    // loop bound.
    let table_end = count
        .checked_mul(LMP_HEADER_SIZE)
        .and_then(|size| size.checked_add(TABLE_START))
        .filter(|&end| end <= region.len())
        .ok_or_else(|| {
            Error::malformed(format!(
                "{count} directory headers do not fit in a {:#x} byte lump",
                region.len()
            ))
        })?;
    log::trace!("LMP header table ends at {table_end:#x}");

    let mut directory = Directory::new();
    for index in 0..count {
        let header = TABLE_START + index * LMP_HEADER_SIZE;
        let name = region.c_string(header, LMP_NAME_SIZE)?;
        let offset = region.get_le_uint(header + OFFSET_FIELD)? as usize;
        let len = region.get_le_uint(header + LENGTH_FIELD)? as usize;

        let entry = region.sub_region(offset, len).map_err(|_| {
            Error::malformed(format!(
                "entry '{name}' ({offset:#x}+{len:#x}) exceeds lump length {:#x}",
                region.len()
            ))
        })?;
        directory.insert(name, entry);
    }
    Ok((directory, table_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(buf: &mut [u8], index: usize, name: &str, offset: u32, len: u32) {
        let base = TABLE_START + index * LMP_HEADER_SIZE;
        buf[base..base + name.len()].copy_from_slice(name.as_bytes());
        buf[base + OFFSET_FIELD..base + OFFSET_FIELD + 4].copy_from_slice(&offset.to_le_bytes());
        buf[base + LENGTH_FIELD..base + LENGTH_FIELD + 4].copy_from_slice(&len.to_le_bytes());
    }

    #[test]
    fn test_entries_relative_to_lump_start() {
        let mut data = vec![0u8; 0x200];
        let lump = &mut data[0x40..];
        lump[..4].copy_from_slice(&2u32.to_le_bytes());
        header(lump, 0, "barrel.tex", 0x100, 0x20);
        header(lump, 1, "barrel.vif", 0x120, 0x10);
        lump[0x100] = 0xAB;

        let outer = ByteRegion::tail(&data, 0x40).unwrap();
        let lmp = LmpArchive::parse(outer).unwrap();
        let tex = lmp.find_entry("barrel.tex").unwrap();
        assert_eq!(tex.start(), 0x140);
        assert_eq!(tex.len(), 0x20);
        assert_eq!(tex.get_unsigned_byte(0).unwrap(), 0xAB);
        assert_eq!(lmp.entry_names(), ["barrel.tex", "barrel.vif"]);
        assert_eq!(lmp.extent(), 0x130);
    }

    #[test]
    fn test_extent_of_empty_lump_is_count_word() {
        let data = [0u8; 0x20];
        assert_eq!(LmpArchive::from_bytes(&data).unwrap().extent(), 4);
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let mut data = vec![0u8; 0x80];
        data[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            LmpArchive::from_bytes(&data),
            Err(Error::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_entry_past_end_is_rejected() {
        let mut data = vec![0u8; 0x80];
        data[..4].copy_from_slice(&1u32.to_le_bytes());
        header(&mut data, 0, "a.tex", 0x70, 0x20);
        assert!(matches!(
            LmpArchive::from_bytes(&data),
            Err(Error::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_truncated_count() {
        let data = [1u8, 0];
        assert!(matches!(LmpArchive::from_bytes(&data), Err(Error::Data(_))));
    }
}
