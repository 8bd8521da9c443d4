use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use ArborFS::resolve::{RefScope, Resolved};
use ArborFS::stream::{copy_chunked, WriteSink};
use ArborFS::{blob, ArborConfig, LocalVfs, Repository};

pub fn exec(path: PathBuf, file: String, commit: String, out: Option<PathBuf>) -> Result<()> {
    let repo = Repository::open(&path, ArborConfig::from_env(), Box::new(LocalVfs::new()))?;

    // Все цели открываются до первого байта на выход: отсутствующий
    // файл проваливает команду целиком, без усечённого вывода.
    let targets = match repo.resolve(RefScope::Read(&commit), &file)? {
        Resolved::File(p) => vec![p],
        Resolved::Wildcard { dir } => repo.expand_wildcard(&dir)?,
    };
    let mut readers = Vec::with_capacity(targets.len());
    for t in &targets {
        readers.push(blob::read(repo.vfs(), t)?);
    }

    let dest: Box<dyn Write + Send> = match &out {
        Some(p) => {
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Box::new(std::fs::File::create(p)?)
        }
        None => Box::new(std::io::stdout()),
    };

    let chunk_size = repo.config().chunk_size;
    let mut sink = WriteSink::new(dest, format!("get {}@{}", file, commit));
    let mut total: u64 = 0;
    for mut r in readers {
        total += copy_chunked(&mut *r, &mut sink, chunk_size)?;
    }
    sink.finish()?;

    if let Some(p) = out {
        println!("OK get: {} B -> {}", total, p.display());
    }
    Ok(())
}
