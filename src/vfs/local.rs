//! Local-filesystem implementation of the snapshot seam.
//!
//! snapshot/fork mechanics: copy the whole tree into `<parent>/.tmp/<unique>`,
//! then `rename` into place. The rename is the publication point; a reader
//! never observes a half-copied commit or branch. Leftover staging from a
//! failed copy is removed best-effort.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::SystemTime;

use log::debug;
use uuid::Uuid;

use crate::consts::TMP_DIR;
use crate::errors::{Result, StoreError};
use crate::util::fsync_dir;

use super::{EntryInfo, Vfs};

#[derive(Debug, Default)]
pub struct LocalVfs;

impl LocalVfs {
    pub fn new() -> Self {
        LocalVfs
    }

    fn copy_publish(&self, src: &Path, dst: &Path, op: &'static str) -> Result<()> {
        let parent = dst.parent().ok_or_else(|| {
            StoreError::io(
                format!("{} {}", op, dst.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"),
            )
        })?;
        let stage_root = parent.join(TMP_DIR);
        fs::create_dir_all(&stage_root)
            .map_err(|e| StoreError::io(format!("mkdir {}", stage_root.display()), e))?;

        let base = dst
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "publish".to_string());
        let stage = stage_root.join(format!("{}-{}", base, Uuid::new_v4()));

        if let Err(e) = copy_tree(src, &stage) {
            let _ = fs::remove_dir_all(&stage);
            return Err(e);
        }
        if let Err(e) = fs::rename(&stage, dst) {
            let _ = fs::remove_dir_all(&stage);
            return Err(StoreError::io(
                format!("{} publish {}", op, dst.display()),
                e,
            ));
        }
        // best-effort: make the rename durable
        let _ = fsync_dir(parent);
        debug!("{}: {} -> {}", op, src.display(), dst.display());
        Ok(())
    }
}

impl Vfs for LocalVfs {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let f = fs::File::open(path)
            .map_err(|e| StoreError::io(format!("open {}", path.display()), e))?;
        Ok(Box::new(f))
    }

    fn create_new(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let f = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| StoreError::io(format!("create {}", path.display()), e))?;
        Ok(Box::new(f))
    }

    fn open_overwrite(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let f = fs::File::create(path)
            .map_err(|e| StoreError::io(format!("overwrite {}", path.display()), e))?;
        Ok(Box::new(f))
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<EntryInfo>> {
        let rd = fs::read_dir(dir)
            .map_err(|e| StoreError::io(format!("read dir {}", dir.display()), e))?;
        let mut out = Vec::new();
        for entry in rd {
            let entry =
                entry.map_err(|e| StoreError::io(format!("read dir {}", dir.display()), e))?;
            let md = entry
                .metadata()
                .map_err(|e| StoreError::io(format!("stat {}", entry.path().display()), e))?;
            out.push(EntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: md.is_dir(),
                // mtime unsupported on a platform -> epoch
                modified: md.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        Ok(out)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(format!("mkdir {}", dir.display()), e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| StoreError::io(format!("remove {}", path.display()), e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn snapshot(&self, src: &Path, dst: &Path) -> Result<()> {
        self.copy_publish(src, dst, "snapshot")
    }

    fn fork(&self, src: &Path, dst: &Path) -> Result<()> {
        self.copy_publish(src, dst, "fork")
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| StoreError::io(format!("mkdir {}", dst.display()), e))?;
    let rd =
        fs::read_dir(src).map_err(|e| StoreError::io(format!("read dir {}", src.display()), e))?;
    for entry in rd {
        let entry = entry.map_err(|e| StoreError::io(format!("read dir {}", src.display()), e))?;
        let ft = entry
            .file_type()
            .map_err(|e| StoreError::io(format!("stat {}", entry.path().display()), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if ft.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            // regular files and symlink targets; special files are not expected here
            fs::copy(&from, &to)
                .map_err(|e| StoreError::io(format!("copy {}", from.display()), e))?;
        }
    }
    Ok(())
}
