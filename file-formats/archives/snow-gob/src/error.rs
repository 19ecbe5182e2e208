//! Error types for the GOB/LMP readers

use snow_data::SnowDataError;
use thiserror::Error;

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for archive operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A directory read ran past the end of the container
    #[error(transparent)]
    Data(#[from] SnowDataError),

    /// Directory records are inconsistent with the container
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// Entry not present in the directory
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

impl Error {
    /// Create a new MalformedArchive error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Error::MalformedArchive(msg.into())
    }

    /// Check if this error indicates the container is corrupted
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Data(_) | Error::MalformedArchive(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::malformed("bad record").is_corruption());
        assert!(Error::Data(SnowDataError::out_of_range(0, 4, 2)).is_corruption());
        assert!(!Error::EntryNotFound("a.lmp".to_string()).is_corruption());
        assert_eq!(
            Error::malformed("bad record").to_string(),
            "Malformed archive: bad record"
        );
    }
}
