//! Decoded animation clips

use std::sync::OnceLock;

use glam::Vec3;
use snow_data::ByteRegion;

use crate::densify::densify;
use crate::error::Result;
use crate::header::AnimHeader;
use crate::kinematics::world_poses;
use crate::pose::{AnimPose, BASE_POSE_STRIDE, read_base_pose, read_binding_pose};
use crate::skeleton::Skeleton;
use crate::stream::read_delta_stream;

/// A fully decoded animation.
///
/// Local poses are evaluated eagerly for every frame. World poses are
/// composed on first use and cached.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimationClip {
    header: AnimHeader,
    skeleton: Skeleton,
    binding_pose: Vec<Vec3>,
    local: Vec<Vec<AnimPose>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    world: OnceLock<Vec<Vec<AnimPose>>>,
}

impl AnimationClip {
    /// Build a clip from already evaluated local poses, indexed `[frame][bone]`
    pub fn new(
        header: AnimHeader,
        skeleton: Skeleton,
        binding_pose: Vec<Vec3>,
        local: Vec<Vec<AnimPose>>,
    ) -> Self {
        Self {
            header,
            skeleton,
            binding_pose,
            local,
            world: OnceLock::new(),
        }
    }

    /// Header as stored
    pub fn header(&self) -> &AnimHeader {
        &self.header
    }

    /// Bone hierarchy
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Rest offset of every bone
    pub fn binding_pose(&self) -> &[Vec3] {
        &self.binding_pose
    }

    /// Number of bones
    pub fn num_bones(&self) -> usize {
        self.header.num_bones
    }

    /// Number of frames, at least 1
    pub fn num_frames(&self) -> usize {
        self.local.len()
    }

    /// Local pose of `bone` at `frame`
    pub fn local_pose(&self, frame: usize, bone: usize) -> Option<&AnimPose> {
        self.local.get(frame)?.get(bone)
    }

    /// Local poses of every bone at `frame`
    pub fn local_poses(&self, frame: usize) -> Option<&[AnimPose]> {
        self.local.get(frame).map(Vec::as_slice)
    }

    /// World pose of `bone` at `frame`
    pub fn world_pose(&self, frame: usize, bone: usize) -> Option<&AnimPose> {
        self.world().get(frame)?.get(bone)
    }

    /// World poses of every bone at `frame`
    pub fn world_poses(&self, frame: usize) -> Option<&[AnimPose]> {
        self.world().get(frame).map(Vec::as_slice)
    }

    fn world(&self) -> &[Vec<AnimPose>] {
        self.world.get_or_init(|| {
            self.local
                .iter()
                .map(|frame| world_poses(&self.skeleton, frame))
                .collect()
        })
    }
}

/// Decode an animation.
///
/// The delta stream starts directly after the base pose table.
///
/// # Errors
///
/// Fails on a malformed header or skeleton, a delta for an undeclared bone,
/// or any read past the end of `region`.
pub fn decode_animation(region: &ByteRegion<'_>) -> Result<AnimationClip> {
    let header = AnimHeader::parse(region)?;
    let num_bones = header.num_bones;

    let skeleton = Skeleton::read(region, header.skeleton_offset, num_bones)?;
    let base = read_base_pose(region, header.base_pose_offset, num_bones)?;
    let binding_pose = read_binding_pose(region, header.binding_pose_offset, num_bones)?;

    let stream_offset = header.base_pose_offset + num_bones * BASE_POSE_STRIDE;
    let stream = read_delta_stream(region, stream_offset, num_bones)?;
    let local = densify(&base, &stream);

    log::debug!(
        "Decoded animation: {} bones, {} frames, {} deltas",
        num_bones,
        local.len(),
        stream.records.len()
    );
    Ok(AnimationClip::new(header, skeleton, binding_pose, local))
}
