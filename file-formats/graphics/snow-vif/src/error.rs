//! Error types for VIF decoding

use snow_data::SnowDataError;
use thiserror::Error;

/// Result type alias for VIF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding VIF geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read ran past the end of the file or mesh stream
    #[error(transparent)]
    Data(#[from] SnowDataError),

    /// The mesh count or offset table is inconsistent with the file
    #[error("Malformed VIF header: {0}")]
    MalformedHeader(String),

    /// The stream uses a construct the decoder does not understand
    #[error("Unsupported VIF data: {0}")]
    UnsupportedFormat(String),

    /// A chunk's strip GIF tag selects a primitive other than a triangle strip
    #[error("Chunk primitive {prim:#x} is not a triangle strip")]
    NotTriangleStrip {
        /// PRIM field of the chunk's strip tag
        prim: u16,
    },

    /// A triangle references a strip slot that has no UV
    #[error("Strip slot {slot} has no UV")]
    MissingUv {
        /// Strip slot without UV data
        slot: usize,
    },

    /// A strip slot resolves to a vertex the chunk never uploaded
    #[error("Vertex index {index} out of range, mesh has {count} vertices")]
    VertexOutOfRange {
        /// Resolved vertex index
        index: usize,
        /// Number of vertices known at that point
        count: usize,
    },
}

impl Error {
    /// Create a new MalformedHeader error
    pub fn malformed_header<S: Into<String>>(msg: S) -> Self {
        Error::MalformedHeader(msg.into())
    }

    /// Create a new UnsupportedFormat error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedFormat(msg.into())
    }

    /// Whether the data is intact but uses a construct the decoder skips
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::NotTriangleStrip { .. }
        )
    }
}
