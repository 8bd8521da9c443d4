use anyhow::Result;
use std::path::PathBuf;

use ArborFS::{ArborConfig, LocalVfs, Repository};

pub fn exec(path: PathBuf, branch: String) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    let id = repo.commit(&branch)?;
    println!("{}", id);
    Ok(())
}
