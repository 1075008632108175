use thiserror::Error;

/// Errors raised by catalogue operations.
///
/// Argument validation distinguishes two kinds: `InvalidType` when an
/// argument is not of an acceptable kind at all, `InvalidValue` when the
/// kind is right but the value breaks a domain constraint (empty text,
/// negative duration, a path that names no file). Filesystem and JSON
/// failures during persistence pass through as their own variants.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("invalid type: {0}")]
    InvalidType(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LibraryError {
    pub fn is_invalid_type(&self) -> bool {
        matches!(self, LibraryError::InvalidType(_))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, LibraryError::InvalidValue(_))
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
