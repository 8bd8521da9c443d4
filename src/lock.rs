//! Per-branch file locking for write/commit serialization.
//!
//! Cross-platform (fs2) advisory locks, opt-in via config (branch_locks):
//! - one lock file per branch: <root>/.locks/<branch>.lock;
//! - exclusive only: the holder serializes writes and commits on that
//!   branch, so a write acknowledged before a commit call is always
//!   captured by that commit;
//! - released on Drop.
//!
//! Branch names are validated before they reach this module, so the name
//! is safe to embed in a file name.

use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::{LOCKS_DIR, LOCK_EXT};
use crate::errors::{Result, StoreError};

pub struct BranchLock {
    file: std::fs::File,
    path: PathBuf,
    branch: String,
}

impl BranchLock {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl Drop for BranchLock {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = self.file.unlock();
    }
}

fn open_lock_file(root: &Path, branch: &str) -> Result<(std::fs::File, PathBuf)> {
    let dir = root.join(LOCKS_DIR);
    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::io(format!("mkdir {}", dir.display()), e))?;
    let path = dir.join(format!("{}.{}", branch, LOCK_EXT));
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| StoreError::io(format!("open lock file {}", path.display()), e))?;
    Ok((f, path))
}

/// Acquire the branch lock. Blocks until the current holder releases it.
pub fn acquire_branch_lock(root: &Path, branch: &str) -> Result<BranchLock> {
    let (file, path) = open_lock_file(root, branch)?;
    file.lock_exclusive()
        .map_err(|e| StoreError::io(format!("lock_exclusive {}", path.display()), e))?;
    Ok(BranchLock {
        file,
        path,
        branch: branch.to_string(),
    })
}

/// Try to acquire without blocking. None when another holder has the lock.
pub fn try_acquire_branch_lock(root: &Path, branch: &str) -> Result<Option<BranchLock>> {
    let (file, path) = open_lock_file(root, branch)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(BranchLock {
            file,
            path,
            branch: branch.to_string(),
        })),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
        Err(e) => Err(StoreError::io(
            format!("try_lock_exclusive {}", path.display()),
            e,
        )),
    }
}
