//! Lightweight global metrics for ArborFS.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - HTTP surface (requests / failures)
//! - Blob facade (read / create / overwrite / delete)
//! - Streaming (chunks, bytes in/out)
//! - Version store (commits / branches)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- HTTP -----
static REQUESTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static REQUESTS_FAILED: AtomicU64 = AtomicU64::new(0);

// ----- Blob facade -----
static FILES_READ: AtomicU64 = AtomicU64::new(0);
static FILES_CREATED: AtomicU64 = AtomicU64::new(0);
static FILES_OVERWRITTEN: AtomicU64 = AtomicU64::new(0);
static FILES_DELETED: AtomicU64 = AtomicU64::new(0);

// ----- Streaming -----
static CHUNKS_OUT: AtomicU64 = AtomicU64::new(0);
static BYTES_OUT: AtomicU64 = AtomicU64::new(0);
static BYTES_IN: AtomicU64 = AtomicU64::new(0);

// ----- Version store -----
static COMMITS_CREATED: AtomicU64 = AtomicU64::new(0);
static BRANCHES_CREATED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // HTTP
    pub requests_total: u64,
    pub requests_failed: u64,

    // Blob facade
    pub files_read: u64,
    pub files_created: u64,
    pub files_overwritten: u64,
    pub files_deleted: u64,

    // Streaming
    pub chunks_out: u64,
    pub bytes_out: u64,
    pub bytes_in: u64,

    // Version store
    pub commits_created: u64,
    pub branches_created: u64,
}

impl MetricsSnapshot {
    pub fn failure_ratio(&self) -> f64 {
        if self.requests_total == 0 {
            0.0
        } else {
            self.requests_failed as f64 / self.requests_total as f64
        }
    }

    pub fn avg_chunk_bytes(&self) -> f64 {
        if self.chunks_out == 0 {
            0.0
        } else {
            self.bytes_out as f64 / self.chunks_out as f64
        }
    }
}

// ----- Recorders (HTTP) -----
pub fn record_request() {
    REQUESTS_TOTAL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_request_failed() {
    REQUESTS_FAILED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Blob facade) -----
pub fn record_file_read() {
    FILES_READ.fetch_add(1, Ordering::Relaxed);
}

pub fn record_file_created(bytes: u64) {
    FILES_CREATED.fetch_add(1, Ordering::Relaxed);
    BYTES_IN.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_file_overwritten(bytes: u64) {
    FILES_OVERWRITTEN.fetch_add(1, Ordering::Relaxed);
    BYTES_IN.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_file_deleted() {
    FILES_DELETED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Streaming) -----
pub fn record_chunk_out(bytes: usize) {
    CHUNKS_OUT.fetch_add(1, Ordering::Relaxed);
    BYTES_OUT.fetch_add(bytes as u64, Ordering::Relaxed);
}

// ----- Recorders (Version store) -----
pub fn record_commit() {
    COMMITS_CREATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_branch() {
    BRANCHES_CREATED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        requests_total: REQUESTS_TOTAL.load(Ordering::Relaxed),
        requests_failed: REQUESTS_FAILED.load(Ordering::Relaxed),

        files_read: FILES_READ.load(Ordering::Relaxed),
        files_created: FILES_CREATED.load(Ordering::Relaxed),
        files_overwritten: FILES_OVERWRITTEN.load(Ordering::Relaxed),
        files_deleted: FILES_DELETED.load(Ordering::Relaxed),

        chunks_out: CHUNKS_OUT.load(Ordering::Relaxed),
        bytes_out: BYTES_OUT.load(Ordering::Relaxed),
        bytes_in: BYTES_IN.load(Ordering::Relaxed),

        commits_created: COMMITS_CREATED.load(Ordering::Relaxed),
        branches_created: BRANCHES_CREATED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    REQUESTS_TOTAL.store(0, Ordering::Relaxed);
    REQUESTS_FAILED.store(0, Ordering::Relaxed);

    FILES_READ.store(0, Ordering::Relaxed);
    FILES_CREATED.store(0, Ordering::Relaxed);
    FILES_OVERWRITTEN.store(0, Ordering::Relaxed);
    FILES_DELETED.store(0, Ordering::Relaxed);

    CHUNKS_OUT.store(0, Ordering::Relaxed);
    BYTES_OUT.store(0, Ordering::Relaxed);
    BYTES_IN.store(0, Ordering::Relaxed);

    COMMITS_CREATED.store(0, Ordering::Relaxed);
    BRANCHES_CREATED.store(0, Ordering::Relaxed);
}
