use anyhow::Result;
use std::path::PathBuf;

use ArborFS::repo::RefEntry;
use ArborFS::{ArborConfig, LocalVfs, Repository};

pub fn exec_commits(path: PathBuf, json: bool) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    print_entries(&repo.list_commits()?, json)
}

pub fn exec_branches(path: PathBuf, json: bool) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    print_entries(&repo.list_branches()?, json)
}

fn print_entries(entries: &[RefEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else {
        for e in entries {
            println!("{}    {}", e.name, e.modified);
        }
    }
    Ok(())
}
