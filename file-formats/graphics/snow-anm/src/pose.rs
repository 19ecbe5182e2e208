//! Bone poses

use glam::{Quat, Vec3};
use snow_data::ByteRegion;

use crate::error::Result;

/// Bytes per bone in the base pose table
pub const BASE_POSE_STRIDE: usize = 0x0E;

/// Bytes per bone in the binding pose table
pub const BINDING_POSE_STRIDE: usize = 0x08;

/// Fixed-point scale of stored positions
pub const POSITION_SCALE: f32 = 64.0;

/// Fixed-point scale of stored rotation components
pub const ROTATION_SCALE: f32 = 4096.0;

/// Zero quaternion, the angular velocity of a bone at rest
pub const ZERO_QUAT: Quat = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);

/// One bone's transform at one frame.
///
/// Local poses carry the velocities in effect at that frame. World poses
/// produced by forward kinematics carry zero velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimPose {
    /// Bone index
    pub bone: usize,
    /// Frame index
    pub frame: usize,
    /// Translation
    pub position: Vec3,
    /// Rotation, normalised in decoded clips
    pub rotation: Quat,
    /// Raw position delta per 512 frames
    pub velocity: Vec3,
    /// Raw rotation delta per 131072 frames, component-wise
    pub angular_velocity: Quat,
}

impl AnimPose {
    /// Pose at rest with no velocity
    pub fn at_rest(bone: usize, frame: usize, position: Vec3, rotation: Quat) -> Self {
        Self {
            bone,
            frame,
            position,
            rotation,
            velocity: Vec3::ZERO,
            angular_velocity: ZERO_QUAT,
        }
    }
}

/// Normalise `q`, falling back to identity for a zero quaternion
pub fn normalize_or_identity(q: Quat) -> Quat {
    glam::Vec4::from(q)
        .try_normalize()
        .map_or(Quat::IDENTITY, Quat::from_vec4)
}

/// Frame 0 pose of every bone.
///
/// Each record holds three position shorts followed by the rotation as
/// `w, x, y, z` shorts.
pub fn read_base_pose(region: &ByteRegion<'_>, offset: usize, num_bones: usize) -> Result<Vec<AnimPose>> {
    (0..num_bones)
        .map(|bone| {
            let at = offset + bone * BASE_POSE_STRIDE;
            let short = |i: usize| -> Result<f32> { Ok(f32::from(region.get_le_short(at + i * 2)?)) };
            let position = Vec3::new(short(0)?, short(1)?, short(2)?) / POSITION_SCALE;
            let (w, x, y, z) = (short(3)?, short(4)?, short(5)?, short(6)?);
            let rotation = Quat::from_xyzw(x, y, z, w) * (1.0 / ROTATION_SCALE);
            Ok(AnimPose::at_rest(bone, 0, position, rotation))
        })
        .collect()
}

/// Rest offsets of every bone, stored negated
pub fn read_binding_pose(region: &ByteRegion<'_>, offset: usize, num_bones: usize) -> Result<Vec<Vec3>> {
    (0..num_bones)
        .map(|bone| {
            let at = offset + bone * BINDING_POSE_STRIDE;
            let short = |i: usize| -> Result<f32> { Ok(f32::from(region.get_le_short(at + i * 2)?)) };
            Ok(-Vec3::new(short(0)?, short(1)?, short(2)?) / POSITION_SCALE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shorts(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_base_pose_record() {
        let data = shorts(&[64, -128, 32, 4096, 0, 2048, 0]);
        let poses = read_base_pose(&ByteRegion::whole(&data), 0, 1).unwrap();
        assert_eq!(poses[0].position, Vec3::new(1.0, -2.0, 0.5));
        assert_eq!(poses[0].rotation, Quat::from_xyzw(0.0, 0.5, 0.0, 1.0));
        assert_eq!(poses[0].velocity, Vec3::ZERO);
        assert_eq!(poses[0].angular_velocity, ZERO_QUAT);
    }

    #[test]
    fn test_binding_pose_is_negated() {
        let data = shorts(&[64, -64, 0, 0]);
        let pose = read_binding_pose(&ByteRegion::whole(&data), 0, 1).unwrap();
        assert_eq!(pose, [Vec3::new(-1.0, 1.0, 0.0)]);
    }

    #[test]
    fn test_zero_quaternion_normalises_to_identity() {
        assert_eq!(normalize_or_identity(ZERO_QUAT), Quat::IDENTITY);
        let q = normalize_or_identity(Quat::from_xyzw(0.0, 0.0, 2.0, 0.0));
        assert_eq!(q, Quat::from_xyzw(0.0, 0.0, 1.0, 0.0));
    }
}
