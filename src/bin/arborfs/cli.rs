use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Локальный (без сервера) CLI поверх того же ядра, что и arborfs_server.
#[derive(Parser, Debug)]
#[command(name = "arborfs", version, about = "ArborFS versioned file store CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Initialize a repository (root + default branch)
    Init {
        #[arg(long)]
        path: PathBuf,
    },
    /// Write a file into a branch (create or replace)
    Put {
        #[arg(long)]
        path: PathBuf,
        /// Logical file path inside the branch, e.g. a/b.txt
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "master")]
        branch: String,
        /// Content as a literal string (UTF-8). Ignored if --value-file is set.
        #[arg(long)]
        value: Option<String>,
        /// Read content bytes from a file ("-" = stdin)
        #[arg(long)]
        value_file: Option<PathBuf>,
    },
    /// Read a file (trailing `*` concatenates the directory's files)
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        file: String,
        /// Commit id or branch name to read from
        #[arg(long, default_value = "master")]
        commit: String,
        /// Optional file to write raw bytes into (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a file from a branch
    Del {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "master")]
        branch: String,
    },
    /// Freeze a branch into a new immutable commit, print its id
    Commit {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value = "master")]
        branch: String,
    },
    /// Fork a commit into a new mutable branch
    Branch {
        #[arg(long)]
        path: PathBuf,
        /// Source commit id (or branch name)
        #[arg(long)]
        commit: String,
        /// New branch name
        #[arg(long)]
        name: String,
    },
    /// List commits (id + mtime)
    Commits {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List branches (name + mtime)
    Branches {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
