//! Шов к снапшот-примитиву.
//!
//! Ядро (resolve/repo/blob) не трогает std::fs напрямую — все операции идут
//! через трейт [`Vfs`]: открытие/создание/удаление файлов, листинг одного
//! уровня, mkdir -p, и два «публикующих» копирования поддерева:
//! snapshot (ветка -> коммит) и fork (коммит -> ветка).
//!
//! Поставляемая реализация — [`LocalVfs`] поверх обычной файловой системы
//! (local.rs). Copy-on-write здесь эмулируется полным копированием в
//! staging-каталог и атомарным rename при публикации.

use std::io::{Read, Write};
use std::path::Path;
use std::time::SystemTime;

use crate::errors::Result;

mod local;

pub use local::LocalVfs;

/// One directory entry, single level (no recursion).
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub modified: SystemTime,
}

/// Filesystem capabilities the core consumes.
///
/// Contract notes:
/// - `snapshot`/`fork` publish `dst` atomically: a concurrent reader sees
///   either no `dst` or the complete copy, never a partial tree.
/// - `create_new` fails when the path already exists; `open_overwrite`
///   truncates or creates.
/// - All errors are surfaced unmodified inside [`crate::StoreError::Io`].
pub trait Vfs: Send + Sync {
    /// Open an existing file for reading.
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Create a new file for writing; the path must not exist yet.
    fn create_new(&self, path: &Path) -> Result<Box<dyn Write + Send>>;

    /// Open a file for writing with truncate-or-create semantics.
    fn open_overwrite(&self, path: &Path) -> Result<Box<dyn Write + Send>>;

    /// Entries directly inside `dir`.
    fn list_dir(&self, dir: &Path) -> Result<Vec<EntryInfo>>;

    /// Recursive directory ensure (mkdir -p), idempotent.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Publish an immutable copy of the `src` tree at `dst` (branch -> commit).
    fn snapshot(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Publish a mutable copy of the `src` tree at `dst` (commit -> branch).
    fn fork(&self, src: &Path, dst: &Path) -> Result<()>;
}
