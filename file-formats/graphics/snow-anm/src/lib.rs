#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod clip;
pub mod densify;
pub mod error;
pub mod header;
pub mod kinematics;
pub mod pose;
pub mod skeleton;
pub mod stream;

pub use clip::{AnimationClip, decode_animation};
pub use densify::{WorkingTable, densify};
pub use error::{Error, Result};
pub use header::AnimHeader;
pub use kinematics::world_poses;
pub use pose::{AnimPose, normalize_or_identity};
pub use skeleton::Skeleton;
pub use stream::{Delta, DeltaRecord, DeltaStream, MAX_FRAMES, read_delta_stream};
