//! Blob facade: single-file operations on resolved physical paths.
//!
//! Reads acquire the handle FIRST and classify the failure immediately;
//! only then is the reader handed to the transport, which releases the
//! handle on every exit path (RAII). Writes ensure parent directories and
//! then stream the payload in bounded chunks; there is no tmp+rename for
//! blobs — a mid-write failure leaves whatever partial state the primitive
//! left, and the caller reports the response as failed.

use std::io::Read;
use std::path::Path;

use crate::errors::{Result, StoreError};
use crate::metrics;
use crate::stream::{copy_chunked, WriteSink};
use crate::vfs::Vfs;

fn missing(e: StoreError, what: &'static str, path: &Path) -> StoreError {
    if e.is_missing() {
        StoreError::NotFound {
            what,
            name: path.display().to_string(),
        }
    } else {
        e
    }
}

/// Open an existing file for streaming out.
pub fn read(vfs: &dyn Vfs, path: &Path) -> Result<Box<dyn Read + Send>> {
    let r = vfs.open_read(path).map_err(|e| missing(e, "file", path))?;
    metrics::record_file_read();
    Ok(r)
}

/// Write a new file from `src`; fails if the path already exists.
/// Returns bytes written.
pub fn create(vfs: &dyn Vfs, path: &Path, src: &mut dyn Read, chunk_size: usize) -> Result<u64> {
    ensure_parent(vfs, path)?;
    let out = vfs.create_new(path)?;
    let mut sink = WriteSink::new(out, format!("write {}", path.display()));
    let n = copy_chunked(src, &mut sink, chunk_size)?;
    sink.finish()?;
    metrics::record_file_created(n);
    Ok(n)
}

/// Replace (or create) the file at `path` from `src`. Returns bytes written.
pub fn overwrite(
    vfs: &dyn Vfs,
    path: &Path,
    src: &mut dyn Read,
    chunk_size: usize,
) -> Result<u64> {
    ensure_parent(vfs, path)?;
    let out = vfs.open_overwrite(path)?;
    let mut sink = WriteSink::new(out, format!("write {}", path.display()));
    let n = copy_chunked(src, &mut sink, chunk_size)?;
    sink.finish()?;
    metrics::record_file_overwritten(n);
    Ok(n)
}

/// Remove the file at `path`.
pub fn delete(vfs: &dyn Vfs, path: &Path) -> Result<()> {
    vfs.remove_file(path).map_err(|e| missing(e, "file", path))?;
    metrics::record_file_deleted();
    Ok(())
}

fn ensure_parent(vfs: &dyn Vfs, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        vfs.ensure_dir(parent)?;
    }
    Ok(())
}
