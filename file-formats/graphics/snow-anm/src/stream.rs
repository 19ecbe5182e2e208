//! Delta stream parsing
//!
//! Each record starts with two bytes:
//!
//! | Byte | Bits | Meaning                                              |
//! |------|------|------------------------------------------------------|
//! | 0    | 0-7  | frames since the previous record                     |
//! | 1    | 0-5  | bone, 0x3F ends the stream                           |
//! | 1    | 6    | components are signed bytes rather than LE16         |
//! | 1    | 7    | angular velocity (4 components) rather than velocity |
//!
//! Angular velocity components are stored `w, x, y, z`.

use glam::{Quat, Vec3};
use snow_data::ByteRegion;

use crate::error::{Error, Result};

/// Selector bone value that terminates the stream
pub const END_OF_STREAM: u8 = 0x3F;

/// Largest frame count a stream may describe
pub const MAX_FRAMES: usize = 0x4000;

const BONE_MASK: u8 = 0x3F;
const BYTE_COMPONENTS: u8 = 0x40;
const ROTATION: u8 = 0x80;

/// New rate for one channel of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delta {
    /// Position velocity
    Velocity(Vec3),
    /// Rotation angular velocity
    AngularVelocity(Quat),
}

/// One record of the delta stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaRecord {
    /// Absolute frame the record takes effect
    pub frame: usize,
    /// Bone the record applies to
    pub bone: usize,
    /// The new rate
    pub delta: Delta,
}

/// Parsed delta stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeltaStream {
    /// Records in stream order; frames never decrease
    pub records: Vec<DeltaRecord>,
    /// Frames covered, last record frame plus one
    pub num_frames: usize,
}

/// Parse the delta stream starting at `offset` and running to the
/// terminator or the end of `region`
pub fn read_delta_stream(region: &ByteRegion<'_>, offset: usize, num_bones: usize) -> Result<DeltaStream> {
    let mut at = offset;
    let mut frame = 0usize;
    let mut records = Vec::new();

    while at < region.len() {
        let run_length = region.get_unsigned_byte(at)?;
        let selector = region.get_unsigned_byte(at + 1)?;
        at += 2;

        let bone = selector & BONE_MASK;
        if bone == END_OF_STREAM {
            break;
        }
        let bone = usize::from(bone);
        if bone >= num_bones {
            return Err(Error::UnknownBone { bone, num_bones });
        }
        frame += usize::from(run_length);
        if frame >= MAX_FRAMES {
            return Err(Error::TooManyFrames {
                frames: frame + 1,
                limit: MAX_FRAMES,
            });
        }

        let bytes = selector & BYTE_COMPONENTS != 0;
        let count = if selector & ROTATION != 0 { 4 } else { 3 };
        let mut components = [0.0f32; 4];
        for component in components.iter_mut().take(count) {
            *component = if bytes {
                let value = region.get_byte(at)?;
                at += 1;
                f32::from(value)
            } else {
                let value = region.get_le_short(at)?;
                at += 2;
                f32::from(value)
            };
        }

        let [a, b, c, d] = components;
        let delta = if count == 4 {
            Delta::AngularVelocity(Quat::from_xyzw(b, c, d, a))
        } else {
            Delta::Velocity(Vec3::new(a, b, c))
        };
        records.push(DeltaRecord { frame, bone, delta });
    }

    log::debug!("Delta stream: {} records over {} frames", records.len(), frame + 1);
    Ok(DeltaStream {
        records,
        num_frames: frame + 1,
    })
}
