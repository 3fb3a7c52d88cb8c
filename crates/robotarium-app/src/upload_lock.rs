//! Cross-process exclusion for build runs
//!
//! Two Robotarium instances uploading to the same serial port at once leave
//! the board half-flashed. An exclusive `fs2` lock on a well-known file keeps
//! a second instance out until the first releases it.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use robotarium_core::prelude::*;

const LOCK_FILENAME: &str = "upload.lock";

/// Held for the duration of a build run; released on drop.
#[derive(Debug)]
pub struct UploadLock {
    file: File,
    path: PathBuf,
}

impl UploadLock {
    /// `<data_local_dir>/robotarium/upload.lock`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("robotarium")
            .join(LOCK_FILENAME)
    }

    /// Take the lock without waiting.
    ///
    /// Fails with [`Error::PipelineBusy`] if another holder has it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        if let Err(e) = file.try_lock_exclusive() {
            debug!("Upload lock {:?} is held elsewhere: {}", path, e);
            return Err(Error::PipelineBusy);
        }

        debug!("Acquired upload lock {:?}", path);
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release upload lock {:?}: {}", self.path, e);
        }
    }
}
