//! Cross-process reindex exclusion
//!
//! Reindexing is a single exclusive-writer operation. Within a process the
//! engine serializes writers itself; across processes an advisory file lock
//! in the sks root keeps two `sks index` invocations from interleaving.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Result, SksError};

pub struct IndexLock {
    #[allow(dead_code)]
    lock_file: File,
    #[allow(dead_code)]
    lock_path: PathBuf,
}

impl IndexLock {
    const LOCK_FILENAME: &'static str = "index.lock";

    /// Try to acquire the lock without blocking. Returns `None` when another
    /// process holds it.
    pub fn try_acquire(sks_root: &Path) -> Result<Option<Self>> {
        let lock_path = sks_root.join(Self::LOCK_FILENAME);
        std::fs::create_dir_all(sks_root)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| SksError::LockFailed(format!("open lock file: {e}")))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                debug!("index lock held by another process");
                return Ok(None);
            }
            Err(e) => {
                return Err(SksError::LockFailed(format!(
                    "acquire exclusive lock: {e}"
                )));
            }
        }

        debug!("acquired index lock at {:?}", lock_path);
        Ok(Some(Self {
            lock_file,
            lock_path,
        }))
    }
}

impl Drop for IndexLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.lock_file) {
            debug!("failed to release index lock: {e}");
        }
        debug!("released index lock");
    }
}
