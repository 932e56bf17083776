//! Renaming the extracted release archive
//!
//! GitHub zipballs extract to a folder named after the repository and commit
//! (e.g., `softtent-toolkit-1a2b3c4`). The host expects the plugin's own
//! directory name, so the folder is moved before installation continues.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum RelocationError {
    #[error("Failed to rename plugin folder during update: {from} -> {to}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Filesystem move primitive provided by the host
pub trait FileMover: Send + Sync {
    fn move_dir(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Moves directories with `std::fs::rename`, never replacing an existing destination
pub struct FsMover;

impl FileMover for FsMover {
    fn move_dir(&self, from: &Path, to: &Path) -> io::Result<()> {
        if to.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination {} already exists", to.display()),
            ));
        }
        std::fs::rename(from, to)
    }
}

pub struct SourceRelocator {
    mover: Box<dyn FileMover>,
}

impl SourceRelocator {
    pub fn new(mover: Box<dyn FileMover>) -> Self {
        Self { mover }
    }

    /// Moves `extracted` to `expected` and returns the path the installer should use
    pub fn relocate(&self, extracted: &Path, expected: &Path) -> Result<PathBuf, RelocationError> {
        if extracted == expected {
            return Ok(extracted.to_path_buf());
        }

        debug!("Renaming {:?} to {:?}", extracted, expected);
        self.mover.move_dir(extracted, expected).map_err(|source| {
            error!("Failed to move {:?} to {:?}: {}", extracted, expected, source);
            RelocationError::Move {
                from: extracted.to_path_buf(),
                to: expected.to_path_buf(),
                source,
            }
        })?;

        Ok(expected.to_path_buf())
    }
}

impl Default for SourceRelocator {
    fn default() -> Self {
        Self::new(Box::new(FsMover))
    }
}
