//! Dense per-frame local poses
//!
//! Position and rotation are integrated as independent channels. Each
//! channel remembers the frame of its last record, its value there and its
//! rate. A record for one channel integrates that channel up to the record
//! frame and then replaces the rate:
//!
//! ```text
//! position = position + velocity * (frame - velocity_frame) / 512
//! rotation = rotation + angular_velocity * (frame - angular_velocity_frame) / 131072
//! ```
//!
//! The pose at a record frame holds the updated channel and the other
//! channel's value from its own last record, not extrapolated. Frames
//! without a record for a bone extrapolate from that bone's last record
//! frame with both current rates.

use glam::{Quat, Vec3};

use crate::pose::{AnimPose, normalize_or_identity};
use crate::stream::{Delta, DeltaRecord, DeltaStream};

/// Frames per unit of velocity
pub const VELOCITY_FRAMES: f32 = 512.0;

/// Frames per unit of angular velocity
pub const ANGULAR_VELOCITY_FRAMES: f32 = 131_072.0;

/// Channel state of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoneTrack {
    position: Vec3,
    velocity: Vec3,
    velocity_frame: usize,
    rotation: Quat,
    angular_velocity: Quat,
    angular_velocity_frame: usize,
    /// Frame of the last record for this bone, either channel
    record_frame: usize,
}

impl BoneTrack {
    fn from_base(pose: &AnimPose) -> Self {
        Self {
            position: pose.position,
            velocity: pose.velocity,
            velocity_frame: pose.frame,
            rotation: pose.rotation,
            angular_velocity: pose.angular_velocity,
            angular_velocity_frame: pose.frame,
            record_frame: pose.frame,
        }
    }

    fn apply(&mut self, frame: usize, delta: Delta) {
        match delta {
            Delta::Velocity(velocity) => {
                let elapsed = frame.saturating_sub(self.velocity_frame) as f32;
                self.position += self.velocity * (elapsed / VELOCITY_FRAMES);
                self.velocity = velocity;
                self.velocity_frame = frame;
            }
            Delta::AngularVelocity(angular_velocity) => {
                let elapsed = frame.saturating_sub(self.angular_velocity_frame) as f32;
                self.rotation += self.angular_velocity * (elapsed / ANGULAR_VELOCITY_FRAMES);
                self.angular_velocity = angular_velocity;
                self.angular_velocity_frame = frame;
            }
        }
        self.record_frame = frame;
    }

    fn pose(&self, bone: usize, frame: usize) -> AnimPose {
        let elapsed = frame.saturating_sub(self.record_frame) as f32;
        let position = self.position + self.velocity * (elapsed / VELOCITY_FRAMES);
        let rotation = self.rotation + self.angular_velocity * (elapsed / ANGULAR_VELOCITY_FRAMES);
        AnimPose {
            bone,
            frame,
            position,
            rotation: normalize_or_identity(rotation),
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }
}

/// Per-bone channel state owned by one decode
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingTable {
    tracks: Vec<BoneTrack>,
}

impl WorkingTable {
    /// Start every bone from its base pose
    pub fn new(base: &[AnimPose]) -> Self {
        Self {
            tracks: base.iter().map(BoneTrack::from_base).collect(),
        }
    }

    /// Apply one record; records for unknown bones are ignored
    pub fn apply(&mut self, record: &DeltaRecord) {
        if let Some(track) = self.tracks.get_mut(record.bone) {
            track.apply(record.frame, record.delta);
        }
    }

    /// Local pose of every bone at `frame`
    pub fn poses_at(&self, frame: usize) -> Vec<AnimPose> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(bone, track)| track.pose(bone, frame))
            .collect()
    }
}

/// Local pose of every bone at every frame, indexed `[frame][bone]`
pub fn densify(base: &[AnimPose], stream: &DeltaStream) -> Vec<Vec<AnimPose>> {
    let mut table = WorkingTable::new(base);
    let mut records = stream.records.iter().peekable();
    let mut frames = Vec::with_capacity(stream.num_frames);

    for frame in 0..stream.num_frames {
        while let Some(record) = records.next_if(|r| r.frame <= frame) {
            table.apply(record);
        }
        frames.push(table.poses_at(frame));
    }
    frames
}
