use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use ArborFS::ident::is_commit_id;
use ArborFS::server::{HttpServer, ServerCtx};
use ArborFS::{ArborConfig, LocalVfs, Repository};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("arborfs-http-{prefix}-{pid}-{t}-{id}"))
}

/// Spin up a server on an ephemeral port; the accept loop runs for the
/// rest of the process (test servers are never shut down).
fn spawn_server(prefix: &str) -> Result<(SocketAddr, PathBuf)> {
    let root = unique_root(prefix);
    let repo = Repository::open(&root, ArborConfig::default(), Box::new(LocalVfs::new()))?;
    let server = HttpServer::bind("127.0.0.1:0", ServerCtx { repo })?;
    let addr = server
        .local_addr()
        .ok_or_else(|| anyhow!("server has no ip addr"))?;
    thread::spawn(move || {
        let _ = server.run();
    });
    Ok((addr, root))
}

/// Raw HTTP/1.0 exchange over a fresh connection; returns (status, body).
fn http(addr: SocketAddr, method: &str, target: &str, body: &[u8]) -> Result<(u16, Vec<u8>)> {
    let mut s = TcpStream::connect(addr)?;
    write!(
        s,
        "{} {} HTTP/1.0\r\nHost: arborfs\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        method,
        target,
        body.len()
    )?;
    s.write_all(body)?;
    s.flush()?;

    let mut raw = Vec::new();
    s.read_to_end(&mut raw)?;

    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| anyhow!("no header terminator in response"))?;
    let head = std::str::from_utf8(&raw[..header_end])?;
    let status: u16 = head
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow!("bad status line: {head}"))?
        .parse()?;
    Ok((status, raw[header_end + 4..].to_vec()))
}

fn http_text(addr: SocketAddr, method: &str, target: &str, body: &[u8]) -> Result<(u16, String)> {
    let (st, b) = http(addr, method, target, body)?;
    Ok((st, String::from_utf8_lossy(&b).into_owned()))
}

#[test]
fn scenarios_write_commit_fork_read() -> Result<()> {
    let (addr, root) = spawn_server("scen")?;

    // A: PUT a file on master, literal response body
    let (st, body) = http_text(addr, "PUT", "/pfs/a/b.txt?branch=master", b"hello")?;
    assert_eq!(st, 200, "{body}");
    assert_eq!(
        body,
        format!("Created {}, size: 5.\n", root.join("master/a/b.txt").display())
    );

    // B: commit with no params (defaults to master), body is the bare id
    let (st, id) = http_text(addr, "POST", "/commit", b"")?;
    assert_eq!(st, 200, "{id}");
    assert!(is_commit_id(&id), "not a commit id: {id:?}");
    let (st, got) = http_text(addr, "GET", &format!("/pfs/a/b.txt?commit={id}"), b"")?;
    assert_eq!(st, 200);
    assert_eq!(got, "hello");

    // C: fork the commit into dev, then the listing shows it
    let (st, body) = http_text(addr, "POST", &format!("/branch?commit={id}&branch=dev"), b"")?;
    assert_eq!(st, 200, "{body}");
    assert_eq!(body, format!("Created branch. ({id}) -> dev.\n"));
    let (st, listing) = http_text(addr, "GET", "/branch", b"")?;
    assert_eq!(st, 200);
    assert!(listing.lines().any(|l| l.starts_with("dev    ")), "{listing}");
    assert!(listing.lines().any(|l| l.starts_with("master    ")), "{listing}");

    // commit listing carries the id with a timestamp column
    let (st, listing) = http_text(addr, "GET", "/commit", b"")?;
    assert_eq!(st, 200);
    let line = listing
        .lines()
        .find(|l| l.starts_with(&id))
        .unwrap_or_else(|| panic!("commit {id} missing from: {listing}"));
    assert!(line.contains("    "), "no separator in {line:?}");

    // the commit is frozen: overwrite master, commit-scoped read is stable
    let (st, _) = http_text(addr, "PUT", "/pfs/a/b.txt?branch=master", b"changed")?;
    assert_eq!(st, 200);
    let (_, got) = http_text(addr, "GET", &format!("/pfs/a/b.txt?commit={id}"), b"")?;
    assert_eq!(got, "hello");

    // aiming a write at the commit id is a client error and changes nothing
    let (st, msg) = http_text(addr, "PUT", &format!("/pfs/a/b.txt?branch={id}"), b"EVIL")?;
    assert_eq!(st, 400, "{msg}");
    let (st, _) = http_text(addr, "DELETE", &format!("/pfs/a/b.txt?branch={id}"), b"")?;
    assert_eq!(st, 400);
    let (_, got) = http_text(addr, "GET", &format!("/pfs/a/b.txt?commit={id}"), b"")?;
    assert_eq!(got, "hello");
    Ok(())
}

#[test]
fn scenario_wildcard_concatenation() -> Result<()> {
    let (addr, _root) = spawn_server("wild")?;

    for (name, content) in [("one.txt", "1"), ("two.txt", "2")] {
        let (st, _) = http_text(addr, "PUT", &format!("/pfs/dir/{name}?branch=master"), content.as_bytes())?;
        assert_eq!(st, 200);
    }
    // a subdirectory must be skipped by the expansion
    let (st, _) = http_text(addr, "PUT", "/pfs/dir/sub/three.txt?branch=master", b"3")?;
    assert_eq!(st, 200);

    let (st, got) = http_text(addr, "GET", "/pfs/dir/*?commit=master", b"")?;
    assert_eq!(st, 200);
    assert_eq!(got, "12", "name-ordered concatenation");

    // internal `*` is a client error
    let (st, msg) = http_text(addr, "GET", "/pfs/di*r/x?commit=master", b"")?;
    assert_eq!(st, 400, "{msg}");
    assert!(msg.contains('*'), "{msg}");
    Ok(())
}

#[test]
fn default_scoping_equals_explicit_master() -> Result<()> {
    let (addr, _root) = spawn_server("default")?;

    let (st, _) = http_text(addr, "POST", "/pfs/d.txt", b"data")?;
    assert_eq!(st, 200);

    let (_, explicit) = http_text(addr, "GET", "/pfs/d.txt?commit=master", b"")?;
    let (_, implied) = http_text(addr, "GET", "/pfs/d.txt", b"")?;
    let (_, empty_param) = http_text(addr, "GET", "/pfs/d.txt?commit=", b"")?;
    assert_eq!(explicit, "data");
    assert_eq!(implied, explicit);
    assert_eq!(empty_param, explicit);
    Ok(())
}

#[test]
fn delete_and_errors() -> Result<()> {
    let (addr, root) = spawn_server("errors")?;

    let (st, _) = http_text(addr, "PUT", "/pfs/gone.txt?branch=master", b"x")?;
    assert_eq!(st, 200);
    let (st, body) = http_text(addr, "DELETE", "/pfs/gone.txt?branch=master", b"")?;
    assert_eq!(st, 200);
    assert_eq!(
        body,
        format!("Deleted {}.\n", root.join("master/gone.txt").display())
    );

    // reading it back is a server-side failure (missing files are 500)
    let (st, _) = http_text(addr, "GET", "/pfs/gone.txt", b"")?;
    assert_eq!(st, 500);
    // deleting twice too
    let (st, _) = http_text(addr, "DELETE", "/pfs/gone.txt?branch=master", b"")?;
    assert_eq!(st, 500);

    // forking a missing commit
    let (st, _) = http_text(
        addr,
        "POST",
        "/branch?commit=11111111-2222-4333-8444-555555555555&branch=dev",
        b"",
    )?;
    assert_eq!(st, 500);

    // unsupported verbs on known endpoints
    let (st, _) = http_text(addr, "DELETE", "/ping", b"")?;
    assert_eq!(st, 405);
    let (st, _) = http_text(addr, "PUT", "/commit", b"")?;
    assert_eq!(st, 405);
    let (st, _) = http_text(addr, "PATCH", "/pfs/x?branch=master", b"")?;
    assert_eq!(st, 405);

    // unknown endpoint
    let (st, body) = http_text(addr, "GET", "/nope", b"")?;
    assert_eq!(st, 404);
    assert_eq!(body, "not found\n");
    Ok(())
}

#[test]
fn ping_and_metrics() -> Result<()> {
    let (addr, _root) = spawn_server("ping")?;

    let (st, body) = http_text(addr, "GET", "/ping", b"")?;
    assert_eq!(st, 200);
    assert_eq!(body, "pong\n");

    let (st, body) = http_text(addr, "GET", "/metrics", b"")?;
    assert_eq!(st, 200);
    assert!(body.contains("arborfs_requests_total"), "{body}");
    assert!(body.contains("arborfs_build_info"), "{body}");
    Ok(())
}

#[test]
fn streamed_read_of_a_large_body() -> Result<()> {
    let (addr, _root) = spawn_server("large")?;

    let mut rng = oorandom::Rand32::new(0xa5a5);
    let payload: Vec<u8> = (0..300_000).map(|_| rng.rand_u32() as u8).collect();

    let (st, _) = http(addr, "PUT", "/pfs/big.bin?branch=master", &payload)?;
    assert_eq!(st, 200);
    let (st, got) = http(addr, "GET", "/pfs/big.bin?commit=master", b"")?;
    assert_eq!(st, 200);
    assert_eq!(got.len(), payload.len());
    assert_eq!(got, payload, "streamed body must reconstruct the payload");
    Ok(())
}
