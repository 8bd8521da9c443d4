//! Endpoint handlers.
//!
//! Wire contract (query params `commit`/`branch` default to the default
//! branch when absent or empty):
//! - GET    /pfs/<path>?commit=X  — stream file bytes (trailing `*`:
//!   concatenate every file directly inside the directory)
//! - POST   /pfs/<path>?branch=X  — create file from the request body
//! - PUT    /pfs/<path>?branch=X  — overwrite file from the request body
//! - DELETE /pfs/<path>?branch=X  — remove file
//! - GET    /commit | /branch     — one "name<SEP>mtime" line per entry
//! - POST   /commit?branch=X      — freeze branch, body = new commit id
//! - POST   /branch?commit=X&branch=Y — fork X into new branch Y
//! - GET    /ping                 — liveness
//! - GET    /metrics              — Prometheus text exposition

use std::io::Read;
use std::thread;

use log::{debug, error};

use crate::blob;
use crate::consts::{DEFAULT_BRANCH, LISTING_SEP};
use crate::errors::{Result, StoreError};
use crate::metrics;
use crate::repo::RefEntry;
use crate::resolve::{RefScope, Resolved};
use crate::stream;

use super::params::{decode_path, query_param, split_query};
use super::{Reply, ServerCtx};

pub(super) fn route(
    ctx: &ServerCtx,
    rq: &mut tiny_http::Request,
    method: &str,
    url: &str,
) -> Result<Reply> {
    let (path, query) = split_query(url);

    if let Some(rest) = path.strip_prefix("/pfs/") {
        let logical = decode_path(rest);
        return match method {
            "GET" => pfs_get(ctx, &logical, query),
            "POST" => pfs_write(ctx, rq, &logical, query, false),
            "PUT" => pfs_write(ctx, rq, &logical, query, true),
            "DELETE" => pfs_delete(ctx, &logical, query),
            other => Err(StoreError::UnsupportedMethod(other.to_string())),
        };
    }

    match (method, path) {
        ("GET", "/ping") => Ok(Reply::Text("pong\n".to_string())),
        (_, "/ping") => Err(StoreError::UnsupportedMethod(method.to_string())),

        ("GET", "/commit") => Ok(Reply::Text(render_listing(&ctx.repo.list_commits()?))),
        ("POST", "/commit") => commit_create(ctx, query),
        (_, "/commit") => Err(StoreError::UnsupportedMethod(method.to_string())),

        ("GET", "/branch") => Ok(Reply::Text(render_listing(&ctx.repo.list_branches()?))),
        ("POST", "/branch") => branch_create(ctx, query),
        (_, "/branch") => Err(StoreError::UnsupportedMethod(method.to_string())),

        ("GET", "/metrics") => Ok(Reply::Metrics(metrics_text())),
        (_, "/metrics") => Err(StoreError::UnsupportedMethod(method.to_string())),

        _ => Ok(Reply::NoRoute),
    }
}

/// Ref from the query, default branch when absent or empty.
fn ref_param(query: &str, key: &str) -> String {
    match query_param(query, key) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_BRANCH.to_string(),
    }
}

fn client_gone(e: &StoreError) -> bool {
    matches!(e, StoreError::Io { source, .. }
        if source.kind() == std::io::ErrorKind::BrokenPipe)
}

fn pfs_get(ctx: &ServerCtx, logical: &str, query: &str) -> Result<Reply> {
    let commit = ref_param(query, "commit");
    let repo = &ctx.repo;

    // open every target up front: a missing or unreadable file fails the
    // request before the first byte goes out
    let readers: Vec<Box<dyn Read + Send>> = match repo.resolve(RefScope::Read(&commit), logical)?
    {
        Resolved::File(path) => vec![blob::read(repo.vfs(), &path)?],
        Resolved::Wildcard { dir } => {
            let mut v = Vec::new();
            for f in repo.expand_wildcard(&dir)? {
                v.push(blob::read(repo.vfs(), &f)?);
            }
            v
        }
    };

    let chunk_size = repo.config().chunk_size;
    let label = format!("{}@{}", logical, commit);
    let (sink, body) = stream::chunk_pipe();
    thread::spawn(move || {
        let mut sink = sink;
        let mut total: u64 = 0;
        for mut r in readers {
            match stream::copy_chunked(&mut *r, &mut sink, chunk_size) {
                Ok(n) => total += n,
                Err(e) => {
                    if client_gone(&e) {
                        debug!("client dropped mid-stream ({})", label);
                    } else {
                        error!("stream {}: {}", label, e);
                    }
                    sink.fail(&e);
                    return;
                }
            }
        }
        debug!("streamed {} B ({})", total, label);
    });
    Ok(Reply::Stream(body))
}

fn pfs_write(
    ctx: &ServerCtx,
    rq: &mut tiny_http::Request,
    logical: &str,
    query: &str,
    replace: bool,
) -> Result<Reply> {
    let branch = ref_param(query, "branch");
    let repo = &ctx.repo;
    let path = match repo.resolve(RefScope::Write(&branch), logical)? {
        Resolved::File(p) => p,
        // the resolver rejects write wildcards before we get here
        Resolved::Wildcard { .. } => {
            return Err(StoreError::InvalidPath("wildcard write".to_string()))
        }
    };

    let _guard = repo.write_guard(&branch)?;
    let chunk_size = repo.config().chunk_size;
    let n = if replace {
        blob::overwrite(repo.vfs(), &path, rq.as_reader(), chunk_size)?
    } else {
        blob::create(repo.vfs(), &path, rq.as_reader(), chunk_size)?
    };
    Ok(Reply::Text(format!(
        "Created {}, size: {}.\n",
        path.display(),
        n
    )))
}

fn pfs_delete(ctx: &ServerCtx, logical: &str, query: &str) -> Result<Reply> {
    let branch = ref_param(query, "branch");
    let repo = &ctx.repo;
    let path = match repo.resolve(RefScope::Write(&branch), logical)? {
        Resolved::File(p) => p,
        Resolved::Wildcard { .. } => {
            return Err(StoreError::InvalidPath("wildcard delete".to_string()))
        }
    };

    let _guard = repo.write_guard(&branch)?;
    blob::delete(repo.vfs(), &path)?;
    Ok(Reply::Text(format!("Deleted {}.\n", path.display())))
}

fn commit_create(ctx: &ServerCtx, query: &str) -> Result<Reply> {
    // `commit` is part of the URL contract but ids are always
    // server-generated; only `branch` picks the source tree
    let _ = query_param(query, "commit");
    let branch = ref_param(query, "branch");
    let id = ctx.repo.commit(&branch)?;
    // bare id, no trailing newline
    Ok(Reply::Text(id))
}

fn branch_create(ctx: &ServerCtx, query: &str) -> Result<Reply> {
    let commit = ref_param(query, "commit");
    let branch = ref_param(query, "branch");
    ctx.repo.branch(&commit, &branch)?;
    Ok(Reply::Text(format!(
        "Created branch. ({}) -> {}.\n",
        commit, branch
    )))
}

fn render_listing(entries: &[RefEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(&e.name);
        out.push_str(LISTING_SEP);
        out.push_str(&e.modified);
        out.push('\n');
    }
    out
}

fn metrics_text() -> String {
    let m = metrics::snapshot();
    let mut out = String::new();

    let ver = env!("CARGO_PKG_VERSION");
    out.push_str("# HELP arborfs_build_info Build info.\n");
    out.push_str("# TYPE arborfs_build_info gauge\n");
    out.push_str(&format!("arborfs_build_info{{version=\"{}\"}} 1\n", ver));

    // --- HTTP ---
    out.push_str("# HELP arborfs_requests_total Total HTTP requests accepted.\n");
    out.push_str("# TYPE arborfs_requests_total counter\n");
    out.push_str(&format!("arborfs_requests_total {}\n", m.requests_total));

    out.push_str("# HELP arborfs_requests_failed Requests answered with an error status.\n");
    out.push_str("# TYPE arborfs_requests_failed counter\n");
    out.push_str(&format!("arborfs_requests_failed {}\n", m.requests_failed));

    out.push_str("# HELP arborfs_failure_ratio Failed request ratio (percent).\n");
    out.push_str("# TYPE arborfs_failure_ratio gauge\n");
    out.push_str(&format!(
        "arborfs_failure_ratio {:.2}\n",
        m.failure_ratio() * 100.0
    ));

    // --- Blob facade ---
    out.push_str("# HELP arborfs_files_read Files opened for reading.\n");
    out.push_str("# TYPE arborfs_files_read counter\n");
    out.push_str(&format!("arborfs_files_read {}\n", m.files_read));

    out.push_str("# HELP arborfs_files_created Files created.\n");
    out.push_str("# TYPE arborfs_files_created counter\n");
    out.push_str(&format!("arborfs_files_created {}\n", m.files_created));

    out.push_str("# HELP arborfs_files_overwritten Files overwritten.\n");
    out.push_str("# TYPE arborfs_files_overwritten counter\n");
    out.push_str(&format!("arborfs_files_overwritten {}\n", m.files_overwritten));

    out.push_str("# HELP arborfs_files_deleted Files deleted.\n");
    out.push_str("# TYPE arborfs_files_deleted counter\n");
    out.push_str(&format!("arborfs_files_deleted {}\n", m.files_deleted));

    // --- Streaming ---
    out.push_str("# HELP arborfs_chunks_out Chunks pushed to response streams.\n");
    out.push_str("# TYPE arborfs_chunks_out counter\n");
    out.push_str(&format!("arborfs_chunks_out {}\n", m.chunks_out));

    out.push_str("# HELP arborfs_bytes_out Bytes streamed to clients.\n");
    out.push_str("# TYPE arborfs_bytes_out counter\n");
    out.push_str(&format!("arborfs_bytes_out {}\n", m.bytes_out));

    out.push_str("# HELP arborfs_bytes_in Bytes received into files.\n");
    out.push_str("# TYPE arborfs_bytes_in counter\n");
    out.push_str(&format!("arborfs_bytes_in {}\n", m.bytes_in));

    out.push_str("# HELP arborfs_avg_chunk_bytes Average outbound chunk size (bytes).\n");
    out.push_str("# TYPE arborfs_avg_chunk_bytes gauge\n");
    out.push_str(&format!("arborfs_avg_chunk_bytes {:.2}\n", m.avg_chunk_bytes()));

    // --- Version store ---
    out.push_str("# HELP arborfs_commits_created Commits created.\n");
    out.push_str("# TYPE arborfs_commits_created counter\n");
    out.push_str(&format!("arborfs_commits_created {}\n", m.commits_created));

    out.push_str("# HELP arborfs_branches_created Branches created.\n");
    out.push_str("# TYPE arborfs_branches_created counter\n");
    out.push_str(&format!("arborfs_branches_created {}\n", m.branches_created));

    out
}
