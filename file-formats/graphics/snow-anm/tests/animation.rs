//! End-to-end animation decoding

use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use snow_anm::{Error, decode_animation, normalize_or_identity};
use snow_data::ByteRegion;

const SKELETON_OFFSET: usize = 0x1C;
const BINDING_OFFSET: usize = 0x20;
const BASE_OFFSET: usize = 0x38;

fn le16(out: &mut Vec<u8>, values: &[i16]) {
    out.extend(values.iter().flat_map(|v| v.to_le_bytes()));
}

/// Three bones: a root with two children, each offset by one unit
fn animation(levels: [i8; 3], stream: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    for word in [3i32, 0, BASE_OFFSET as i32, BINDING_OFFSET as i32, SKELETON_OFFSET as i32, 0, 0] {
        data.extend(word.to_le_bytes());
    }
    data.extend(levels.iter().map(|&l| l as u8));
    data.resize(BINDING_OFFSET, 0);
    le16(&mut data, &[-64, 0, 0, 0, 0, -64, 0, 0, 0, 0, -64, 0]);
    assert_eq!(data.len(), BASE_OFFSET);
    le16(&mut data, &[64, 0, 0, 4096, 0, 0, 0]);
    le16(&mut data, &[0, 64, 0, 4096, 0, 0, 0]);
    le16(&mut data, &[0, 0, 64, 4096, 0, 0, 0]);
    data.extend_from_slice(stream);
    data
}

/// Bone 1 moves along x for four frames while the root spins about z
const STREAM: &[u8] = &[
    0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, // frame 0, bone 1 velocity (512, 0, 0)
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, // frame 0, bone 0 angular velocity z
    0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // frame 4, bone 1 stops
    0x00, 0x3F, // end
];

fn root_rotation(frame: usize) -> Quat {
    normalize_or_identity(Quat::from_xyzw(0.0, 0.0, frame as f32 * 0.125, 1.0))
}

#[test]
fn test_frame_zero_is_base_pose() {
    let data = animation([0, 1, 1], STREAM);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();

    assert_eq!(clip.num_bones(), 3);
    assert_eq!(clip.num_frames(), 5);
    let frame0 = clip.local_poses(0).unwrap();
    assert_eq!(frame0.len(), 3);
    assert_eq!(frame0[0].position, Vec3::X);
    assert_eq!(frame0[1].position, Vec3::Y);
    assert_eq!(frame0[2].position, Vec3::Z);
    assert!(frame0.iter().all(|p| p.rotation == Quat::IDENTITY));
    assert_eq!(clip.binding_pose(), [Vec3::X, Vec3::Y, Vec3::Z]);
}

#[test]
fn test_gap_frames_follow_last_velocity() {
    let data = animation([0, 1, 1], STREAM);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();

    for frame in 0..4 {
        let pose = clip.local_pose(frame, 1).unwrap();
        assert_eq!(pose.position, Vec3::new(frame as f32, 1.0, 0.0));
        assert_eq!(pose.velocity, Vec3::new(512.0, 0.0, 0.0));
    }
    let stopped = clip.local_pose(4, 1).unwrap();
    assert_eq!(stopped.position, Vec3::new(4.0, 1.0, 0.0));
    assert_eq!(stopped.velocity, Vec3::ZERO);

    // Bone 2 never receives a record
    assert_eq!(clip.local_pose(3, 2).unwrap().position, Vec3::Z);
    assert!(clip.local_pose(5, 0).is_none());
}

#[test]
fn test_world_poses_compose_down_the_hierarchy() {
    let data = animation([0, 1, 1], STREAM);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();

    for frame in 0..clip.num_frames() {
        let root = clip.world_pose(frame, 0).unwrap();
        let local_root = clip.local_pose(frame, 0).unwrap();
        assert!(root.position.abs_diff_eq(local_root.position, 1e-6));
        assert!(root.rotation.abs_diff_eq(root_rotation(frame), 1e-6));

        let child = clip.world_pose(frame, 1).unwrap();
        let local_child = clip.local_pose(frame, 1).unwrap();
        let expected = root_rotation(frame) * local_child.position + Vec3::X;
        assert!(child.position.abs_diff_eq(expected, 1e-5), "frame {frame}");
        assert_eq!(child.velocity, Vec3::ZERO);
    }
}

#[test]
fn test_second_root_is_not_rotated() {
    let data = animation([0, 1, 0], STREAM);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();

    assert_eq!(clip.skeleton().parents(), [None, Some(0), None]);
    let other_root = clip.world_pose(4, 2).unwrap();
    assert!(other_root.position.abs_diff_eq(Vec3::Z, 1e-6));
    assert!(other_root.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
}

#[test]
fn test_depth_jump_is_malformed() {
    let data = animation([0, 2, 1], STREAM);
    assert_eq!(
        decode_animation(&ByteRegion::whole(&data)).unwrap_err(),
        Error::MalformedSkeleton { bone: 1, level: 2 }
    );
}

#[test]
fn test_delta_for_undeclared_bone() {
    let data = animation([0, 1, 1], &[0x00, 0x05, 0, 0, 0, 0, 0, 0]);
    assert_eq!(
        decode_animation(&ByteRegion::whole(&data)).unwrap_err(),
        Error::UnknownBone { bone: 5, num_bones: 3 }
    );
}

#[test]
fn test_stream_without_terminator_runs_to_end() {
    let data = animation([0, 1, 1], &STREAM[..STREAM.len() - 2]);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();
    assert_eq!(clip.num_frames(), 5);
}

#[test]
fn test_position_record_holds_root_rotation() {
    let stream = [
        0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, // frame 0, bone 0 angular velocity z
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // frame 2, bone 0 velocity zero
        0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // frame 3, bone 2 velocity zero
        0x00, 0x3F,
    ];
    let data = animation([0, 1, 1], &stream);
    let clip = decode_animation(&ByteRegion::whole(&data)).unwrap();

    assert_eq!(clip.num_frames(), 4);
    let rotations: Vec<_> = (0..4).map(|f| clip.local_pose(f, 0).unwrap().rotation).collect();
    assert_eq!(rotations, [root_rotation(0), root_rotation(1), Quat::IDENTITY, root_rotation(1)]);
}

#[test]
fn test_frame_count_is_capped() {
    let stream: Vec<u8> = std::iter::repeat_n([0xFF, 0x41, 0, 0, 0], 65).flatten().collect();
    let data = animation([0, 1, 1], &stream);
    assert!(matches!(
        decode_animation(&ByteRegion::whole(&data)),
        Err(Error::TooManyFrames { limit: snow_anm::MAX_FRAMES, .. })
    ));
}

#[test]
fn test_truncated_base_pose() {
    let data = animation([0, 1, 1], &[]);
    let err = decode_animation(&ByteRegion::whole(&data[..BASE_OFFSET + 20])).unwrap_err();
    assert!(err.is_truncated());
}

proptest! {
    #[test]
    fn decoding_is_total_and_deterministic(stream in proptest::collection::vec(any::<u8>(), 0..64)) {
        let data = animation([0, 1, 1], &stream);
        let region = ByteRegion::whole(&data);
        match (decode_animation(&region), decode_animation(&region)) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.num_frames(), b.num_frames());
                for frame in 0..a.num_frames() {
                    prop_assert_eq!(a.local_poses(frame), b.local_poses(frame));
                    let world = a.world_poses(frame).unwrap();
                    prop_assert_eq!(world.len(), 3);
                    for pose in world {
                        prop_assert!((pose.rotation.length() - 1.0).abs() < 1e-3);
                    }
                }
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "decoding is not deterministic"),
        }
    }
}
