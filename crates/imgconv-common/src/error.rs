use std::path::PathBuf;

/// Unified error type for all imgconv operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported output format: {0}")]
    InvalidFormat(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Refusing to overwrite source file: {0}")]
    WouldOverwriteSource(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Another file in this batch already wrote {0}")]
    DuplicateDestination(PathBuf),

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Encode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures raised while reading the source image
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::FileNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_file() {
        let err = Error::decode("/tmp/a.png", "bad header");
        assert_eq!(err.to_string(), "Failed to decode /tmp/a.png: bad header");
        assert!(err.is_decode());

        let err = Error::encode("/tmp/a.heic", "no codec");
        assert!(!err.is_decode());
        assert!(err.to_string().contains("no codec"));
    }
}
