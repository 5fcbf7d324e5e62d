//! # grid-puzzle
//!
//! `grid-puzzle` solves a small 3×3 grid puzzle with an off-the-shelf solver.
//! Each cell is either active or inactive. A solution has:
//!
//! 1.  exactly two active cells in every row,
//! 2.  exactly two active cells in every column,
//! 3.  at least one active corner.
//!
//! The rules are encoded as linear constraints over nine booleans
//! (`cell_0_0` … `cell_2_2`) and decided by an external solver library.
//!
//! ## Features
//!
//! -   **Backends**: varisat (pure Rust, default) or z3 (`--features z3`).
//! -   **Enumeration**: list every distinct solution with `solve --all`.
//! -   **Board checking**: report which rules a hand-written board breaks.
//! -   **Scrambling**: print a random starting board.
//! -   **Verification**: models are re-checked against the rules unless `--no-verify` is given.
//! -   **Statistics**: problem size, solve time and jemalloc memory usage with `--stats`.
//! -   **Export**: write the encoded problem (DIMACS or SMT-LIB) with `--dump <PATH>`.
//!
//! ## Usage
//!
//! ```sh
//! grid-puzzle [OPTIONS] [COMMAND]
//! ```
//!
//! ### Subcommands
//!
//! 1.  **`solve`** (default): print the first solution.
//!     ```sh
//!     grid-puzzle solve [--all [--limit N]]
//!     ```
//! 2.  **`check`**: check a board, exit 1 if it breaks a rule.
//!     ```sh
//!     grid-puzzle check --board 110,011,101
//!     ```
//! 3.  **`scramble`**: print a random board.
//!     ```sh
//!     grid-puzzle scramble --density 0.3 --seed 42
//!     ```
//! 4.  **`completions`**: generate a shell completion script.
//!
//! ### Common Options
//!
//! -   `--backend <varisat|z3>`: solver library (default: `varisat`).
//! -   `--row-target <N>`, `--column-target <N>`, `--min-corners <N>`: override the rules.
//! -   `-d, --debug`: debug logging on stderr.
//! -   `-s, --stats`: print statistics after solving.
//! -   `--no-verify`: trust solver models as-is.
//! -   `--dump <PATH>`: write the encoded problem to a file.
//!
//! ## Output
//!
//! ```text
//! Solution found:
//! 1 1 0
//! 0 1 1
//! 1 0 1
//! ```
//!
//! or `No solution found`. Both exit with status 0; solver errors exit with 1.

use clap::Parser;
use command_line::cli::{Cli, run};
use std::process::ExitCode;
use tracing::Level;

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Parses the command line, installs the stderr logger and runs the command.
fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.common.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(&cli)
}
