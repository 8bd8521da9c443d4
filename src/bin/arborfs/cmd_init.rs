use anyhow::Result;
use std::path::PathBuf;

use ArborFS::{ArborConfig, LocalVfs, Repository};

pub fn exec(path: PathBuf) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    println!("OK init: {}", repo.root().display());
    Ok(())
}
