//! Centralized configuration for ArborFS.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - ArborConfig::from_env() reads ARBOR_* variables; fluent with_* setters
//!   override individual fields (CLI flags win over env).
//! - The config is built once at startup and travels inside the repository
//!   handle; nothing reads the environment after that.
//!
//! Env variables:
//! - ARBOR_CHUNK_SIZE       — streaming chunk size in bytes (default 65536)
//! - ARBOR_BRANCH_LOCKS     — serialize writers per branch (default off;
//!                            "1|true|yes|on" => on)
//! - ARBOR_SORTED_LISTINGS  — deterministic name order in listings and
//!                            wildcard expansion (default on)
//! - ARBOR_LISTEN           — HTTP listen address (default 0.0.0.0:9080)

use std::fmt;

use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_LISTEN};

#[derive(Clone, Debug)]
pub struct ArborConfig {
    /// Streaming chunk size in bytes; bounds per-request memory.
    /// Env: ARBOR_CHUNK_SIZE (default 65536; values < 1 are ignored)
    pub chunk_size: usize,

    /// Take an advisory per-branch lock around every branch mutation and
    /// around commit, so writes acknowledged before a commit call are
    /// always captured by it.
    /// Env: ARBOR_BRANCH_LOCKS (default false)
    pub branch_locks: bool,

    /// Sort listings and wildcard expansion by name. Off = raw directory
    /// order, whatever the underlying filesystem yields.
    /// Env: ARBOR_SORTED_LISTINGS (default true)
    pub sorted_listings: bool,

    /// HTTP listen address.
    /// Env: ARBOR_LISTEN (default 0.0.0.0:9080)
    pub listen_addr: String,
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            branch_locks: false,
            sorted_listings: true,
            listen_addr: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl ArborConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("ARBOR_CHUNK_SIZE") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n >= 1 {
                    cfg.chunk_size = n;
                }
            }
        }

        if let Ok(v) = std::env::var("ARBOR_BRANCH_LOCKS") {
            let s = v.trim().to_ascii_lowercase();
            cfg.branch_locks = s == "1" || s == "true" || s == "yes" || s == "on";
        }

        if let Ok(v) = std::env::var("ARBOR_SORTED_LISTINGS") {
            let s = v.trim().to_ascii_lowercase();
            cfg.sorted_listings = !(s == "0" || s == "false" || s == "no" || s == "off");
        }

        if let Ok(v) = std::env::var("ARBOR_LISTEN") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.listen_addr = s.to_string();
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        if bytes >= 1 {
            self.chunk_size = bytes;
        }
        self
    }

    pub fn with_branch_locks(mut self, on: bool) -> Self {
        self.branch_locks = on;
        self
    }

    pub fn with_sorted_listings(mut self, on: bool) -> Self {
        self.sorted_listings = on;
        self
    }

    pub fn with_listen_addr<S: Into<String>>(mut self, addr: S) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for ArborConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArborConfig {{ chunk_size: {}, branch_locks: {}, sorted_listings: {}, listen_addr: {} }}",
            self.chunk_size, self.branch_locks, self.sorted_listings, self.listen_addr,
        )
    }
}
