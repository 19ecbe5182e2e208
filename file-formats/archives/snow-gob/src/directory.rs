//! Name to region mapping shared by both container formats

use std::collections::BTreeMap;

use snow_data::ByteRegion;

use crate::error::{Error, Result};

/// Entry names mapped to the byte regions they cover.
///
/// Names are unique within one directory. Registering a name twice keeps the
/// later region; containers in the wild occasionally repeat a name and the
/// last record wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory<'a> {
    entries: BTreeMap<String, ByteRegion<'a>>,
}

impl<'a> Directory<'a> {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, replacing any earlier region with the same name
    pub fn insert(&mut self, name: String, region: ByteRegion<'a>) -> Option<ByteRegion<'a>> {
        let previous = self.entries.insert(name, region);
        if let Some(previous) = &previous {
            log::debug!("Duplicate directory entry, replacing {previous:?} with {region:?}");
        }
        previous
    }

    /// Region for `name`, if present
    pub fn get(&self, name: &str) -> Option<ByteRegion<'a>> {
        self.entries.get(name).copied()
    }

    /// Whether `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ByteRegion<'a>)> + '_ {
        self.entries.iter().map(|(name, region)| (name.as_str(), *region))
    }
}

/// Common lookup surface of the GOB and LMP containers
pub trait ArchiveDirectory<'a> {
    /// The parsed directory
    fn directory(&self) -> &Directory<'a>;

    /// Region for `name`, or `None` when the name is unknown
    fn find_entry(&self, name: &str) -> Option<ByteRegion<'a>> {
        self.directory().get(name)
    }

    /// Region for `name`, failing with [`Error::EntryNotFound`] when unknown
    fn require_entry(&self, name: &str) -> Result<ByteRegion<'a>> {
        self.find_entry(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }

    /// Entry names in sorted order
    fn entry_names<'s>(&'s self) -> Vec<&'s str>
    where
        'a: 's,
    {
        self.directory().iter().map(|(name, _)| name).collect()
    }
}
