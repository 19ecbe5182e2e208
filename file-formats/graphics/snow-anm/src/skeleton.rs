//! Bone hierarchy
//!
//! The skeleton table stores one signed depth byte per bone, in an order
//! where every parent precedes its children. A bone at depth `d > 0` hangs
//! off the most recent earlier bone at depth `d - 1`; depth 0 bones hang off
//! the origin.

use snow_data::ByteRegion;

use crate::error::{Error, Result};

/// Parent links of every bone
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Skeleton {
    levels: Vec<i8>,
    parents: Vec<Option<usize>>,
}

impl Skeleton {
    /// Resolve parents from per-bone depths
    pub fn from_levels(levels: Vec<i8>) -> Result<Self> {
        // last_at_depth[d] is the most recent bone seen at depth d
        let mut last_at_depth: Vec<usize> = Vec::new();
        let mut parents = Vec::with_capacity(levels.len());

        for (bone, &level) in levels.iter().enumerate() {
            let depth = usize::try_from(level)
                .map_err(|_| Error::MalformedSkeleton { bone, level })?;
            let parent = match depth {
                0 => None,
                _ => Some(
                    *last_at_depth
                        .get(depth - 1)
                        .ok_or(Error::MalformedSkeleton { bone, level })?,
                ),
            };
            last_at_depth.truncate(depth);
            last_at_depth.push(bone);
            parents.push(parent);
        }

        Ok(Self { levels, parents })
    }

    /// Read `num_bones` depth bytes at `offset`
    pub fn read(region: &ByteRegion<'_>, offset: usize, num_bones: usize) -> Result<Self> {
        let levels = region
            .bytes(offset, num_bones)?
            .iter()
            .map(|&b| b as i8)
            .collect();
        Self::from_levels(levels)
    }

    /// Number of bones
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the skeleton has no bones
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent of `bone`, `None` for bones attached to the origin
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents.get(bone).copied().flatten()
    }

    /// Depth stored for `bone`
    pub fn level(&self, bone: usize) -> Option<i8> {
        self.levels.get(bone).copied()
    }

    /// Parent of every bone in table order
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Direct children of `bone`
    pub fn children(&self, bone: usize) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter(move |(_, parent)| **parent == Some(bone))
            .map(|(child, _)| child)
    }
}
