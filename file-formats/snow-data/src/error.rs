//! Error type shared by every Snowblind decoder

use thiserror::Error;

/// Low-level failure raised by [`ByteRegion`](crate::ByteRegion) accessors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnowDataError {
    /// A read of `size` bytes at `offset` does not fit inside a region of `len` bytes
    #[error("read of {size} bytes at offset {offset:#x} exceeds region length {len:#x}")]
    OutOfRange {
        /// Offset of the failed read, relative to the region start
        offset: usize,
        /// Number of bytes requested
        size: usize,
        /// Length of the region
        len: usize,
    },
}

impl SnowDataError {
    /// Build an `OutOfRange` error
    pub fn out_of_range(offset: usize, size: usize, len: usize) -> Self {
        Self::OutOfRange { offset, size, len }
    }
}

/// Result type alias for byte access
pub type Result<T> = std::result::Result<T, SnowDataError>;
