use anyhow::Result;
use std::path::PathBuf;

use ArborFS::{ArborConfig, LocalVfs, Repository};

pub fn exec(path: PathBuf, commit: String, name: String) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    repo.branch(&commit, &name)?;
    println!("OK branch: ({}) -> {}", commit, name);
    Ok(())
}
