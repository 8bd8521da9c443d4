use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

mod cli;
mod cmd_init;
mod cmd_put;
mod cmd_get;
mod cmd_del;
mod cmd_commit;
mod cmd_branch;
mod cmd_list;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — warn (CLI печатает сам).
    Builder::from_env(Env::default().default_filter_or("warn"))
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
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Init { path } => cmd_init::exec(path),

        cli::Cmd::Put { path, file, branch, value, value_file } =>
            cmd_put::exec(path, file, branch, value, value_file),

        cli::Cmd::Get { path, file, commit, out } =>
            cmd_get::exec(path, file, commit, out),

        cli::Cmd::Del { path, file, branch } =>
            cmd_del::exec(path, file, branch),

        cli::Cmd::Commit { path, branch } => cmd_commit::exec(path, branch),

        cli::Cmd::Branch { path, commit, name } =>
            cmd_branch::exec(path, commit, name),

        cli::Cmd::Commits { path, json } => cmd_list::exec_commits(path, json),

        cli::Cmd::Branches { path, json } => cmd_list::exec_branches(path, json),
    }
}
