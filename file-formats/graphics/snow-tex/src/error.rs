//! Error types for texture decoding

use snow_data::SnowDataError;
use thiserror::Error;

/// Result type alias for texture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding a texture
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A header, palette or pixel read ran past the texture region
    #[error(transparent)]
    Data(#[from] SnowDataError),

    /// The texture uses a layout the decoder does not understand
    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Create a new UnsupportedFormat error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedFormat(msg.into())
    }

    /// Whether the texture was skipped because of its layout rather than
    /// truncated or corrupt data
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_))
    }
}
