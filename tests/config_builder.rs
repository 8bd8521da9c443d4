use anyhow::Result;

use ArborFS::ArborConfig;
use ArborFS::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_LISTEN};

#[test]
fn defaults_match_consts() {
    let cfg = ArborConfig::default();
    assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
    assert!(!cfg.branch_locks);
    assert!(cfg.sorted_listings);
    assert_eq!(cfg.listen_addr, DEFAULT_LISTEN);
}

#[test]
fn builder_overrides_and_guards() {
    let cfg = ArborConfig::default()
        .with_chunk_size(4096)
        .with_branch_locks(true)
        .with_sorted_listings(false)
        .with_listen_addr("127.0.0.1:0")
        .build();
    assert_eq!(cfg.chunk_size, 4096);
    assert!(cfg.branch_locks);
    assert!(!cfg.sorted_listings);
    assert_eq!(cfg.listen_addr, "127.0.0.1:0");

    // chunk_size below 1 is ignored, not applied
    let cfg = ArborConfig::default().with_chunk_size(0);
    assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
}

#[test]
fn display_shows_every_field() {
    let s = format!("{}", ArborConfig::default());
    for needle in ["chunk_size", "branch_locks", "sorted_listings", "listen_addr"] {
        assert!(s.contains(needle), "{needle} missing from: {s}");
    }
}

// env-var parsing lives in one test: parallel test threads share the
// process environment
#[test]
fn env_parsing_and_precedence() -> Result<()> {
    std::env::set_var("ARBOR_CHUNK_SIZE", "1234");
    std::env::set_var("ARBOR_BRANCH_LOCKS", "yes");
    std::env::set_var("ARBOR_SORTED_LISTINGS", "off");
    std::env::set_var("ARBOR_LISTEN", "0.0.0.0:7070");

    let cfg = ArborConfig::from_env();
    assert_eq!(cfg.chunk_size, 1234);
    assert!(cfg.branch_locks);
    assert!(!cfg.sorted_listings);
    assert_eq!(cfg.listen_addr, "0.0.0.0:7070");

    // builder wins over env (CLI-flag precedence)
    let cfg = ArborConfig::from_env().with_chunk_size(9000).build();
    assert_eq!(cfg.chunk_size, 9000);

    // garbage and zero values fall back to defaults
    std::env::set_var("ARBOR_CHUNK_SIZE", "not-a-number");
    assert_eq!(ArborConfig::from_env().chunk_size, DEFAULT_CHUNK_SIZE);
    std::env::set_var("ARBOR_CHUNK_SIZE", "0");
    assert_eq!(ArborConfig::from_env().chunk_size, DEFAULT_CHUNK_SIZE);

    // truthiness list: anything else reads as false
    std::env::set_var("ARBOR_BRANCH_LOCKS", "definitely");
    assert!(!ArborConfig::from_env().branch_locks);

    for k in [
        "ARBOR_CHUNK_SIZE",
        "ARBOR_BRANCH_LOCKS",
        "ARBOR_SORTED_LISTINGS",
        "ARBOR_LISTEN",
    ] {
        std::env::remove_var(k);
    }
    Ok(())
}
