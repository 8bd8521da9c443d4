use anyhow::{anyhow, Result};
use std::path::PathBuf;

use ArborFS::resolve::{RefScope, Resolved};
use ArborFS::{blob, ArborConfig, LocalVfs, Repository};

pub fn exec(path: PathBuf, file: String, branch: String) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    let physical = match repo.resolve(RefScope::Write(&branch), &file)? {
        Resolved::File(p) => p,
        Resolved::Wildcard { .. } => return Err(anyhow!("wildcards are read-only")),
    };
    let _guard = repo.write_guard(&branch)?;
    blob::delete(repo.vfs(), &physical)?;
    println!("OK del: {}", physical.display());
    Ok(())
}
