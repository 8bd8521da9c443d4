use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;

use ArborFS::lock::{acquire_branch_lock, try_acquire_branch_lock};
use ArborFS::{ArborConfig, LocalVfs, Repository};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("arborfs-lock-{prefix}-{pid}-{t}-{id}"))
}

fn mkroot(prefix: &str) -> Result<PathBuf> {
    let root = unique_root(prefix);
    std::fs::create_dir_all(&root)?;
    Ok(root)
}

#[test]
fn lock_is_exclusive_until_dropped() -> Result<()> {
    let root = mkroot("excl")?;

    let g1 = acquire_branch_lock(&root, "master")?;
    assert_eq!(g1.branch(), "master");
    assert!(g1.path().starts_with(root.join(".locks")));

    // second acquisition must not succeed while g1 is held
    assert!(try_acquire_branch_lock(&root, "master")?.is_none());

    drop(g1);
    assert!(try_acquire_branch_lock(&root, "master")?.is_some());
    Ok(())
}

#[test]
fn locks_are_per_branch() -> Result<()> {
    let root = mkroot("per-branch")?;
    let _master = acquire_branch_lock(&root, "master")?;
    // an unrelated branch is not serialized against master
    assert!(try_acquire_branch_lock(&root, "dev")?.is_some());
    Ok(())
}

#[test]
fn blocking_acquire_waits_for_the_holder() -> Result<()> {
    let root = mkroot("wait")?;
    let (held_tx, held_rx) = mpsc::channel();

    let holder = {
        let root = root.clone();
        thread::spawn(move || -> Result<()> {
            let g = acquire_branch_lock(&root, "master")?;
            held_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(150));
            drop(g);
            Ok(())
        })
    };

    held_rx.recv().unwrap();
    let started = SystemTime::now();
    // blocks until the holder drops
    let _g = acquire_branch_lock(&root, "master")?;
    let waited = started.elapsed().unwrap_or_default();
    assert!(
        waited >= Duration::from_millis(100),
        "acquire returned too early: {:?}",
        waited
    );
    holder.join().expect("holder panicked")?;
    Ok(())
}

fn guard_of(repo: &Repository) -> Result<bool> {
    Ok(repo.write_guard("master")?.is_some())
}

#[test]
fn write_guard_follows_config() -> Result<()> {
    let root = unique_root("guard");
    let off = Repository::open(&root, ArborConfig::default(), Box::new(LocalVfs::new()))?;
    assert!(!guard_of(&off)?, "guard must be None with locks off");

    let on = Repository::open(
        &root,
        ArborConfig::default().with_branch_locks(true),
        Box::new(LocalVfs::new()),
    )?;
    assert!(guard_of(&on)?, "guard must be Some with locks on");
    Ok(())
}

fn lock_dir_of(root: &Path) -> PathBuf {
    root.join(".locks")
}

#[test]
fn commit_under_locks_creates_the_lock_file() -> Result<()> {
    let root = unique_root("commit");
    let repo = Repository::open(
        &root,
        ArborConfig::default().with_branch_locks(true),
        Box::new(LocalVfs::new()),
    )?;
    let _id = repo.commit("master")?;
    assert!(lock_dir_of(&root).join("master.lock").is_file());
    Ok(())
}
