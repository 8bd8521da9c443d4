use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use std::path::PathBuf;

use ArborFS::server::{HttpServer, ServerCtx};
use ArborFS::{ArborConfig, LocalVfs, Repository};

#[derive(Parser, Debug)]
#[command(
    name = "arborfs_server",
    version,
    about = "ArborFS versioned file store (HTTP server)"
)]
struct Opt {
    /// Repository root directory (created if missing).
    #[arg(long)]
    path: PathBuf,
    /// Listen address; overrides ARBOR_LISTEN.
    #[arg(long)]
    addr: Option<String>,
    /// Streaming chunk size in bytes; overrides ARBOR_CHUNK_SIZE.
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Serialize writers per branch; overrides ARBOR_BRANCH_LOCKS.
    #[arg(long)]
    branch_locks: bool,
}

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    // env сначала, флаги CLI поверх
    let mut cfg = ArborConfig::from_env();
    if let Some(addr) = opt.addr {
        cfg = cfg.with_listen_addr(addr);
    }
    if let Some(n) = opt.chunk_size {
        cfg = cfg.with_chunk_size(n);
    }
    if opt.branch_locks {
        cfg = cfg.with_branch_locks(true);
    }
    let cfg = cfg.build();
    info!("{}", cfg);

    let addr = cfg.listen_addr.clone();
    let repo = Repository::open(&opt.path, cfg, Box::new(LocalVfs::new()))?;
    info!(
        "repository at {} (default branch ensured)",
        repo.root().display()
    );

    let server = HttpServer::bind(&addr, ServerCtx { repo })?;
    if let Some(a) = server.local_addr() {
        info!("arborfs_server listening on {}", a);
    }
    server.run()?;
    Ok(())
}
