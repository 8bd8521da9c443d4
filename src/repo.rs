//! Version store: the commit/branch namespace of one repository.
//!
//! [`Repository`] — явный контекст, собираемый один раз на старте: корень,
//! конфиг и шов к снапшот-примитиву. Никакого глобального состояния;
//! между потоками запросов репозиторий разделяется через Arc.
//!
//! Правила пространства имён:
//! - id коммитов — сгенерированные uuid; имя ветки не может иметь форму id
//!   (отклоняется при создании), поэтому запись верхнего уровня однозначно
//!   является либо коммитом, либо веткой;
//! - имена с точкой в начале — служебные (.locks, .tmp): не видны в
//!   листингах и запрещены как имена веток;
//! - ветка по умолчанию существует всю жизнь репозитория; коммиты не
//!   изменяются и не удаляются, ветки не удаляются.

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::config::ArborConfig;
use crate::consts::DEFAULT_BRANCH;
use crate::errors::{Result, StoreError};
use crate::ident;
use crate::lock::{acquire_branch_lock, BranchLock};
use crate::metrics;
use crate::resolve::{self, RefScope, Resolved};
use crate::util::format_entry_time;
use crate::vfs::Vfs;

/// One listing row: ref name plus formatted mtime.
#[derive(Debug, Clone, Serialize)]
pub struct RefEntry {
    pub name: String,
    pub modified: String,
}

pub struct Repository {
    root: PathBuf,
    cfg: ArborConfig,
    vfs: Box<dyn Vfs>,
}

impl Repository {
    /// Open (and ensure) a repository: the root and the default branch
    /// exist afterwards. Idempotent.
    pub fn open(root: impl Into<PathBuf>, cfg: ArborConfig, vfs: Box<dyn Vfs>) -> Result<Self> {
        let repo = Repository {
            root: root.into(),
            cfg,
            vfs,
        };
        repo.vfs.ensure_dir(&repo.root)?;
        repo.vfs.ensure_dir(&repo.root.join(DEFAULT_BRANCH))?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ArborConfig {
        &self.cfg
    }

    pub fn vfs(&self) -> &dyn Vfs {
        self.vfs.as_ref()
    }

    /// Resolve a logical path in this repository.
    pub fn resolve(&self, scope: RefScope<'_>, logical: &str) -> Result<Resolved> {
        resolve::resolve(&self.root, scope, logical)
    }

    /// Wildcard expansion honoring the configured listing order.
    pub fn expand_wildcard(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        resolve::expand_wildcard(self.vfs(), dir, self.cfg.sorted_listings)
    }

    /// Per-branch serialization guard; None when branch locks are off.
    pub fn write_guard(&self, branch: &str) -> Result<Option<BranchLock>> {
        if self.cfg.branch_locks {
            Ok(Some(acquire_branch_lock(&self.root, branch)?))
        } else {
            Ok(None)
        }
    }

    /// Freeze the current tree of `branch` into a new immutable commit and
    /// return the generated id. The branch stays writable; later writes
    /// never show up in the produced commit.
    pub fn commit(&self, branch: &str) -> Result<String> {
        resolve::validate_ref(branch)?;
        let src = self.root.join(branch);
        if !self.vfs.exists(&src) {
            return Err(StoreError::NotFound {
                what: "branch",
                name: branch.to_string(),
            });
        }
        let _guard = self.write_guard(branch)?;
        let id = ident::new_commit_id();
        let dst = self.root.join(&id);
        self.vfs.snapshot(&src, &dst)?;
        metrics::record_commit();
        info!("commit {} <- branch '{}'", id, branch);
        Ok(id)
    }

    /// Fork the tree at `source` (a commit id, or any existing ref) into a
    /// new mutable branch `name`. Fails with NotFound when the source is
    /// missing and BranchExists when the name is taken.
    pub fn branch(&self, source: &str, name: &str) -> Result<()> {
        resolve::validate_ref(source)?;
        validate_branch_name(name)?;
        let src = self.root.join(source);
        if !self.vfs.exists(&src) {
            return Err(StoreError::NotFound {
                what: "commit",
                name: source.to_string(),
            });
        }
        let dst = self.root.join(name);
        if self.vfs.exists(&dst) {
            return Err(StoreError::BranchExists(name.to_string()));
        }
        let _guard = self.write_guard(name)?;
        self.vfs.fork(&src, &dst)?;
        metrics::record_branch();
        info!("branch '{}' <- {}", name, source);
        Ok(())
    }

    /// Commits at the repository root: id-shaped entries with their mtime.
    pub fn list_commits(&self) -> Result<Vec<RefEntry>> {
        self.list_refs(true)
    }

    /// Branches at the repository root: entries that are not id-shaped.
    pub fn list_branches(&self) -> Result<Vec<RefEntry>> {
        self.list_refs(false)
    }

    fn list_refs(&self, commits: bool) -> Result<Vec<RefEntry>> {
        let mut out = Vec::new();
        for e in self.vfs.list_dir(&self.root)? {
            if e.name.starts_with('.') {
                // internal entries (.locks, .tmp)
                continue;
            }
            if ident::is_commit_id(&e.name) != commits {
                continue;
            }
            out.push(RefEntry {
                name: e.name,
                modified: format_entry_time(e.modified),
            });
        }
        if self.cfg.sorted_listings {
            out.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(out)
    }
}

/// A new branch name must stay out of the commit-id shape and out of the
/// internal dot namespace.
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidPath("empty branch name".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.contains('*') {
        return Err(StoreError::InvalidPath(format!(
            "Illegal branch name `{}`.",
            name
        )));
    }
    if name.starts_with('.') {
        return Err(StoreError::ReservedName(name.to_string()));
    }
    if ident::is_commit_id(name) {
        return Err(StoreError::ReservedName(name.to_string()));
    }
    Ok(())
}
