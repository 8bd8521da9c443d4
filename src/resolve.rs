//! Path resolver: logical repository paths -> physical paths.
//!
//! A logical path is resolved under `<root>/<ref>/`, where the ref is a
//! commit id or branch name taken from the request scope (default branch
//! when the caller omits it). Resolution is pure path computation:
//! - refs with separators, wildcards, `.`/`..` or a leading dot are
//!   rejected (the dot namespace is internal);
//! - a write ref may not have the commit-id shape: commits are frozen, so
//!   the mutable scope is branch names only;
//! - path segments `.` and `..` are rejected, so a request can never climb
//!   out of its ref subtree;
//! - a single trailing `*` turns the request into a wildcard read: the
//!   path with the star stripped names a directory whose non-directory
//!   entries become the read targets. Any other `*` placement fails.

use std::path::{Path, PathBuf};

use crate::errors::{Result, StoreError};
use crate::ident;
use crate::vfs::Vfs;

/// Request scope: reads resolve against a commit (or any ref), writes
/// against a branch.
#[derive(Debug, Clone, Copy)]
pub enum RefScope<'a> {
    Read(&'a str),
    Write(&'a str),
}

impl<'a> RefScope<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            RefScope::Read(r) | RefScope::Write(r) => r,
        }
    }
}

/// Outcome of path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Single physical file path.
    File(PathBuf),
    /// Trailing-star read: enumerate files directly inside `dir`.
    Wildcard { dir: PathBuf },
}

const ILLEGAL_WILDCARD: &str = "Illegal path containing internal `*`. `*` is currently only allowed as the last character of a path.";

/// Validate a commit/branch ref used as the first physical component.
pub fn validate_ref(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidPath("empty ref name".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.contains('*') {
        return Err(StoreError::InvalidPath(format!(
            "Illegal ref name `{}`.",
            name
        )));
    }
    if name.starts_with('.') {
        return Err(StoreError::InvalidPath(format!(
            "Illegal ref name `{}`.",
            name
        )));
    }
    Ok(())
}

/// Resolve `logical` under `<root>/<ref>/`.
pub fn resolve(root: &Path, scope: RefScope<'_>, logical: &str) -> Result<Resolved> {
    validate_ref(scope.name())?;

    // Commit trees never change after creation. Read scopes take any ref;
    // write scopes take branch names only, so an id-shaped ref can never
    // route a mutation into commit space.
    if let RefScope::Write(r) = scope {
        if ident::is_commit_id(r) {
            return Err(StoreError::InvalidPath(format!(
                "Cannot write to commit `{}`. Writes are branch-scoped; commits are immutable.",
                r
            )));
        }
    }

    let (wildcard, effective) = match logical.strip_suffix('*') {
        Some(rest) => (true, rest),
        None => (false, logical),
    };
    if effective.contains('*') {
        return Err(StoreError::InvalidPath(ILLEGAL_WILDCARD.to_string()));
    }
    if wildcard {
        if let RefScope::Write(_) = scope {
            return Err(StoreError::InvalidPath(
                "Illegal path ending in `*`. Wildcards are only allowed for reads.".to_string(),
            ));
        }
    }

    let mut p = root.join(scope.name());
    for seg in effective.split('/') {
        if seg.is_empty() {
            continue;
        }
        if seg == "." || seg == ".." {
            return Err(StoreError::InvalidPath(format!(
                "Illegal path segment `{}`.",
                seg
            )));
        }
        p.push(seg);
    }

    if wildcard {
        Ok(Resolved::Wildcard { dir: p })
    } else {
        Ok(Resolved::File(p))
    }
}

/// Enumerate the read targets of a wildcard: every non-directory entry
/// directly inside `dir` (directories are skipped, not recursed into).
/// With `sorted` the expansion order is name order, otherwise whatever
/// the listing yields.
pub fn expand_wildcard(vfs: &dyn Vfs, dir: &Path, sorted: bool) -> Result<Vec<PathBuf>> {
    let mut entries = vfs.list_dir(dir)?;
    entries.retain(|e| !e.is_dir);
    if sorted {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
    Ok(entries.into_iter().map(|e| dir.join(e.name)).collect())
}
