use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Derives output paths and guards sources against being overwritten
#[derive(Debug, Clone, Default)]
pub struct PathManager {
    output_dir: Option<PathBuf>,
    overwrite: bool,
}

impl PathManager {
    /// `output_dir = None` writes each output next to its source
    pub fn new(output_dir: Option<PathBuf>, overwrite: bool) -> Self {
        Self {
            output_dir,
            overwrite,
        }
    }

    /// Replace the extension of `original`, relocating into the output dir if set.
    /// Format: <dir>/<original-stem>.<new_extension>
    pub fn destination_for(&self, original: &Path, new_extension: &str) -> Result<PathBuf> {
        let file_name = original
            .file_name()
            .ok_or_else(|| Error::InvalidPath(original.to_path_buf()))?;

        let relocated = match &self.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                dir.join(file_name)
            }
            None => original.to_path_buf(),
        };
        let destination = relocated.with_extension(new_extension);

        if is_same_file(original, &destination) {
            return Err(Error::WouldOverwriteSource(original.to_path_buf()));
        }

        if !self.overwrite && destination.exists() {
            return Err(Error::DestinationExists(destination));
        }

        Ok(destination)
    }

    /// Validate input path exists and is a regular file
    pub fn validate_input(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_path_buf()));
        }

        Ok(())
    }
}

// Canonicalize catches case-insensitive filesystems and `./` prefixes
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
