use anyhow::{anyhow, Result};
use std::io::Read;
use std::path::PathBuf;

use ArborFS::resolve::{RefScope, Resolved};
use ArborFS::{blob, ArborConfig, LocalVfs, Repository};

pub fn exec(
    path: PathBuf,
    file: String,
    branch: String,
    value: Option<String>,
    value_file: Option<PathBuf>,
) -> Result<()> {
    let bytes = match (value, value_file) {
        (_, Some(p)) if p.as_os_str() == "-" => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
        (_, Some(p)) => std::fs::read(&p)?,
        (Some(s), None) => s.into_bytes(),
        (None, None) => return Err(anyhow!("either --value or --value-file must be provided")),
    };

    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;
    let physical = match repo.resolve(RefScope::Write(&branch), &file)? {
        Resolved::File(p) => p,
        Resolved::Wildcard { .. } => return Err(anyhow!("wildcards are read-only")),
    };
    let _guard = repo.write_guard(&branch)?;
    let n = blob::overwrite(
        repo.vfs(),
        &physical,
        &mut bytes.as_slice(),
        repo.config().chunk_size,
    )?;
    println!("OK put: {} ({} B) -> {}", file, n, physical.display());
    Ok(())
}
