//! Outer GOB container
//!
//! The directory sits at the start of the file as a run of fixed 0x28-byte
//! records:
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0x00   | 0x20 | entry name, NUL padded        |
//! | 0x20   | 4    | data offset from file start   |
//! | 0x24   | 4    | unused                        |
//!
//! A record with an empty name terminates the table. Records carry no length;
//! each entry's region runs from its offset to the end of the file and the
//! nested lump's own directory bounds what is actually read.

use snow_data::ByteRegion;

use crate::directory::{ArchiveDirectory, Directory};
use crate::error::{Error, Result};

/// Size of one GOB directory record
pub const GOB_RECORD_SIZE: usize = 0x28;

/// Size of the name field at the start of a record
pub const GOB_NAME_SIZE: usize = 0x20;

const DATA_OFFSET_FIELD: usize = 0x20;

/// A parsed GOB container borrowing the loaded file
#[derive(Debug, Clone)]
pub struct GobArchive<'a> {
    data: &'a [u8],
    directory: Directory<'a>,
}

impl<'a> GobArchive<'a> {
    /// Parse the directory of a GOB file held in `data`
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let directory = build_directory(data)?;
        log::debug!("GOB directory holds {} entries", directory.len());
        Ok(Self { data, directory })
    }

    /// The whole container buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> ArchiveDirectory<'a> for GobArchive<'a> {
    fn directory(&self) -> &Directory<'a> {
        &self.directory
    }
}

fn build_directory(data: &[u8]) -> Result<Directory<'_>> {
    let region = ByteRegion::whole(data);
    let mut directory = Directory::new();

    // Every record consumes 0x28 bytes of the file, so the table can never
    // hold more records than this.
    for index in 0..=data.len() / GOB_RECORD_SIZE {
        let record = index * GOB_RECORD_SIZE;
        if record >= data.len() {
            break;
        }

        let name = region.c_string(record, GOB_NAME_SIZE)?;
        if name.is_empty() {
            return Ok(directory);
        }

        let data_offset = region.get_le_int(record + DATA_OFFSET_FIELD)?;
        let entry = usize::try_from(data_offset)
            .ok()
            .and_then(|offset| ByteRegion::tail(data, offset).ok())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "entry '{name}' has data offset {data_offset:#x} outside a {:#x} byte file",
                    data.len()
                ))
            })?;

        log::trace!("GOB entry {name} at {data_offset:#x}");
        directory.insert(name, entry);
    }

    Err(Error::malformed(
        "directory runs to the end of the file without a terminating record",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(buf: &mut [u8], index: usize, name: &str, offset: i32) {
        let base = index * GOB_RECORD_SIZE;
        buf[base..base + name.len()].copy_from_slice(name.as_bytes());
        buf[base + DATA_OFFSET_FIELD..base + DATA_OFFSET_FIELD + 4]
            .copy_from_slice(&offset.to_le_bytes());
    }

    #[test]
    fn test_empty_directory() {
        let data = [0u8; GOB_RECORD_SIZE];
        let gob = GobArchive::parse(&data).unwrap();
        assert!(gob.directory().is_empty());
    }

    #[test]
    fn test_offset_past_end_is_malformed() {
        let mut data = vec![0u8; 0x80];
        record(&mut data, 0, "a.lmp", 0x81);
        assert!(matches!(
            GobArchive::parse(&data),
            Err(Error::MalformedArchive(_))
        ));

        record(&mut data, 0, "a.lmp", -4);
        assert!(matches!(
            GobArchive::parse(&data),
            Err(Error::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_missing_terminator_is_malformed() {
        let mut data = vec![0u8; GOB_RECORD_SIZE * 2];
        record(&mut data, 0, "a.lmp", 0);
        record(&mut data, 1, "b.lmp", 0);
        assert!(matches!(
            GobArchive::parse(&data),
            Err(Error::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_entry_extends_to_end_of_file() {
        let mut data = vec![0u8; 0x100];
        record(&mut data, 0, "a.lmp", 0x80);
        let gob = GobArchive::parse(&data).unwrap();
        let entry = gob.find_entry("a.lmp").unwrap();
        assert_eq!(entry.start(), 0x80);
        assert_eq!(entry.len(), 0x80);
        assert_eq!(gob.find_entry("missing.lmp"), None);
        assert!(matches!(
            gob.require_entry("missing.lmp"),
            Err(Error::EntryNotFound(_))
        ));
    }
}
