//! Error types for animation decoding

use snow_data::SnowDataError;
use thiserror::Error;

/// Result type alias for animation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding an animation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read ran past the end of the animation
    #[error(transparent)]
    Data(#[from] SnowDataError),

    /// Header fields are inconsistent
    #[error("Malformed animation header: {0}")]
    MalformedHeader(String),

    /// A bone's depth has no parent one level up
    #[error("Bone {bone} at depth {level} has no parent")]
    MalformedSkeleton {
        /// Bone index
        bone: usize,
        /// Depth stored for the bone
        level: i8,
    },

    /// The delta stream addresses a bone the header does not declare
    #[error("Delta for bone {bone} but the animation has {num_bones} bones")]
    UnknownBone {
        /// Bone index from the selector
        bone: usize,
        /// Declared bone count
        num_bones: usize,
    },

    /// The run lengths add up to more frames than a clip may hold
    #[error("Delta stream spans {frames} frames, the limit is {limit}")]
    TooManyFrames {
        /// Frames reached when decoding stopped
        frames: usize,
        /// Largest supported frame count
        limit: usize,
    },
}

impl Error {
    /// Create a new MalformedHeader error
    pub fn malformed_header<S: Into<String>>(msg: S) -> Self {
        Error::MalformedHeader(msg.into())
    }

    /// Whether the file is truncated rather than structurally inconsistent
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Data(_))
    }
}
