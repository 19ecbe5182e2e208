//! Forward kinematics

use glam::{Quat, Vec3};

use crate::pose::{AnimPose, ZERO_QUAT, normalize_or_identity};
use crate::skeleton::Skeleton;

/// World transforms of one frame's local poses.
///
/// Parents precede their children in table order, so a single pass sees
/// every parent's world transform before its children need it. A parent
/// index that does not point backwards is treated as the origin.
pub fn world_poses(skeleton: &Skeleton, local: &[AnimPose]) -> Vec<AnimPose> {
    let mut world: Vec<AnimPose> = Vec::with_capacity(local.len());

    for (bone, pose) in local.iter().enumerate() {
        let (parent_rotation, parent_position) = skeleton
            .parent(bone)
            .and_then(|parent| world.get(parent))
            .map_or((Quat::IDENTITY, Vec3::ZERO), |p| (p.rotation, p.position));

        let local_rotation = normalize_or_identity(pose.rotation);
        world.push(AnimPose {
            bone,
            frame: pose.frame,
            position: parent_rotation * pose.position + parent_position,
            rotation: normalize_or_identity(parent_rotation * local_rotation),
            velocity: Vec3::ZERO,
            angular_velocity: ZERO_QUAT,
        });
    }
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_child_inherits_parent_rotation() {
        let skeleton = Skeleton::from_levels(vec![0, 1]).unwrap();
        let local = [
            AnimPose::at_rest(0, 0, Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(FRAC_PI_2)),
            AnimPose::at_rest(1, 0, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY),
        ];
        let world = world_poses(&skeleton, &local);

        assert!(world[0].position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(world[1].position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
        assert!(world[1].rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-6));
        assert_eq!(world[1].angular_velocity, ZERO_QUAT);
    }
}
