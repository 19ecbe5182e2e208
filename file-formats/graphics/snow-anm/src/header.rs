//! Animation header

use snow_data::ByteRegion;

use crate::error::{Error, Result};

/// Fixed header at the start of every animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimHeader {
    /// Number of bones
    pub num_bones: usize,
    /// Base pose table offset
    pub base_pose_offset: usize,
    /// Binding pose table offset
    pub binding_pose_offset: usize,
    /// Skeleton depth table offset
    pub skeleton_offset: usize,
    /// Unidentified word at 0x04
    pub unknown_04: i32,
    /// Unidentified word at 0x14
    pub unknown_14: i32,
    /// Unidentified word at 0x18
    pub unknown_18: i32,
}

impl AnimHeader {
    /// Read the header from the start of `region`
    pub fn parse(region: &ByteRegion<'_>) -> Result<Self> {
        let num_bones = region.get_le_int(0)?;
        let num_bones = usize::try_from(num_bones)
            .map_err(|_| Error::malformed_header(format!("negative bone count {num_bones}")))?;

        let offset = |at: usize, name: &str| -> Result<usize> {
            let value = region.get_le_int(at)?;
            usize::try_from(value)
                .map_err(|_| Error::malformed_header(format!("negative {name} offset {value}")))
        };

        let header = Self {
            num_bones,
            base_pose_offset: offset(0x08, "base pose")?,
            binding_pose_offset: offset(0x0C, "binding pose")?,
            skeleton_offset: offset(0x10, "skeleton")?,
            unknown_04: region.get_le_int(0x04)?,
            unknown_14: region.get_le_int(0x14)?,
            unknown_18: region.get_le_int(0x18)?,
        };
        log::debug!("{header:?}");
        Ok(header)
    }
}
