#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, anyhow, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use grid_puzzle::grid::{Board, GridPuzzle, Outcome, Rules};
use grid_puzzle::smt::{Backend, BackendKind, BackendStats, Session, SolveError, VarisatBackend};
#[cfg(feature = "z3")]
use grid_puzzle::smt::Z3Backend;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the grid puzzle solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "grid-puzzle",
    version,
    about = "Solves a 3x3 grid puzzle: two active cells per row and column, at least one corner"
)]
pub(crate) struct Cli {
    /// Subcommand to execute. Without one the puzzle is solved once.
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Options shared by every command.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve the puzzle and print the first solution.
    Solve {
        /// Enumerate every distinct solution instead of stopping at the first.
        #[arg(short, long, default_value_t = false)]
        all: bool,

        /// Stop enumerating after this many solutions. Must be at least 1.
        #[arg(long, requires = "all")]
        limit: Option<NonZeroUsize>,
    },

    /// Check a board against the rules.
    /// Exits with a failure status if any rule is broken.
    Check {
        /// Rows separated by `,`, `/` or `;`, e.g. `110,011,101`. Cells are `1`/`0` or `#`/`.`.
        #[arg(short, long)]
        board: Board,
    },

    /// Print a random starting board.
    Scramble {
        /// Probability that a cell starts active.
        #[arg(long, default_value_t = 0.3)]
        density: f64,

        /// Seed for a reproducible board.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines command-line options shared across subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Solver library used to decide the puzzle.
    #[arg(long, value_enum, global = true, default_value_t = BackendKind::Varisat)]
    pub(crate) backend: BackendKind,

    /// Active cells required in every row.
    #[arg(long, global = true, default_value_t = 2)]
    pub(crate) row_target: u32,

    /// Active cells required in every column.
    #[arg(long, global = true, default_value_t = 2)]
    pub(crate) column_target: u32,

    /// Minimum number of active corners.
    #[arg(long, global = true, default_value_t = 1)]
    pub(crate) min_corners: u32,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub(crate) debug: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, global = true, default_value_t = false)]
    pub(crate) stats: bool,

    /// Skip re-checking solver models against the rules.
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) no_verify: bool,

    /// Write the encoded problem in the backend's native format to this file.
    #[arg(long, global = true)]
    pub(crate) dump: Option<PathBuf>,
}

impl CommonOptions {
    pub(crate) const fn rules(&self) -> Rules {
        Rules {
            row_target: self.row_target,
            column_target: self.column_target,
            min_corners: self.min_corners,
        }
    }

    fn puzzle(&self) -> GridPuzzle {
        GridPuzzle::new(self.rules()).with_verification(!self.no_verify)
    }
}

/// What a solver run produced, detached from the session that produced it.
#[derive(Debug)]
pub(crate) struct Report {
    pub(crate) backend: &'static str,
    pub(crate) boards: Vec<Board>,
    pub(crate) problem: BackendStats,
    pub(crate) encode_time: Duration,
    pub(crate) solve_time: Duration,
    pub(crate) dump: Option<String>,
}

/// Encodes the puzzle in a fresh session and searches it.
///
/// With `limit == Some(1)` the session is checked exactly once; otherwise
/// solutions are enumerated.
fn search_with<'i, B: Backend<'i>>(
    init: &'i B::Init,
    common: &CommonOptions,
    limit: Option<usize>,
) -> Result<Report, SolveError> {
    let puzzle = common.puzzle();
    let mut session = Session::<B>::new(init);

    let start = Instant::now();
    let grid = puzzle.encode(&mut session)?;
    let encode_time = start.elapsed();
    let dump = common.dump.as_ref().map(|_| session.dump());

    let boards = if limit == Some(1) {
        match puzzle.check(&mut session, &grid)? {
            Outcome::Solved(board) => vec![board],
            Outcome::NoSolution => Vec::new(),
        }
    } else {
        puzzle.enumerate(&mut session, &grid, limit)?
    };

    Ok(Report {
        backend: session.backend_name(),
        boards,
        problem: session.stats(),
        encode_time,
        solve_time: session.solve_time(),
        dump,
    })
}

/// Runs [`search_with`] on the backend selected in `common`.
///
/// # Errors
///
/// Any [`SolveError`] raised while encoding or solving.
pub(crate) fn search(common: &CommonOptions, limit: Option<usize>) -> Result<Report, SolveError> {
    match common.backend {
        BackendKind::Varisat => {
            let init = VarisatBackend::default_init();
            search_with::<VarisatBackend>(&init, common, limit)
        }
        #[cfg(feature = "z3")]
        BackendKind::Z3 => {
            let context = Z3Backend::default_init();
            search_with::<Z3Backend>(&context, common, limit)
        }
    }
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// If solving fails, the solver gives up, or output can not be written.
pub(crate) fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        None => solve(&cli.common, false, None),
        Some(Commands::Solve { all, limit }) => {
            solve(&cli.common, *all, limit.map(NonZeroUsize::get))
        }
        Some(Commands::Check { board }) => check(&cli.common, board),
        Some(Commands::Scramble { density, seed }) => scramble(&cli.common, *density, *seed),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "grid-puzzle",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Solves the puzzle, printing one solution or, with `all`, every solution.
///
/// Both satisfiable and unsatisfiable outcomes exit successfully.
fn solve(common: &CommonOptions, all: bool, limit: Option<usize>) -> anyhow::Result<ExitCode> {
    let report = search(common, if all { limit } else { Some(1) })
        .context("Failed to solve the grid puzzle")?;
    write_dump(common, &report)?;

    let mut out = std::io::stdout().lock();
    if all {
        for (n, board) in report.boards.iter().enumerate() {
            writeln!(out, "Solution {}:\n{board}", n + 1)?;
        }
        writeln!(out, "Total solutions: {}", report.boards.len())?;
    } else {
        let outcome = report
            .boards
            .first()
            .map_or(Outcome::NoSolution, |board| Outcome::Solved(*board));
        outcome.render(&mut out)?;
    }
    drop(out);

    if common.stats {
        print_stats(&report)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints `board`, every rule it breaks, and how close it is to a solution.
fn check(common: &CommonOptions, board: &Board) -> anyhow::Result<ExitCode> {
    let violations = board.violations(&common.rules());
    println!("{board}");
    for violation in &violations {
        println!("Violation: {violation}");
    }

    let report = search(common, Some(1)).context("Failed to solve the grid puzzle")?;
    write_dump(common, &report)?;
    print_completion(board, &report);
    if common.stats {
        print_stats(&report)?;
    }

    if violations.is_empty() {
        println!("All rules satisfied");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Prints a random starting board and how close it is to a solution.
fn scramble(common: &CommonOptions, density: f64, seed: Option<u64>) -> anyhow::Result<ExitCode> {
    ensure!(
        (0.0..=1.0).contains(&density),
        "Density must be between 0 and 1, got {density}"
    );
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let board = Board::scrambled(&mut rng, density);
    println!("{board}");

    let report = search(common, Some(1)).context("Failed to solve the grid puzzle")?;
    write_dump(common, &report)?;
    print_completion(&board, &report);
    if common.stats {
        print_stats(&report)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn print_completion(board: &Board, report: &Report) {
    match report.boards.first() {
        Some(solution) => println!("Completion: {:.0}%", board.agreement(solution) * 100.0),
        None => println!("Completion: n/a (no solution exists)"),
    }
}

fn write_dump(common: &CommonOptions, report: &Report) -> anyhow::Result<()> {
    if let (Some(path), Some(dump)) = (&common.dump, &report.dump) {
        std::fs::write(path, dump)
            .with_context(|| format!("Unable to write {}", path.display()))?;
        tracing::info!("Problem written to {}", path.display());
    }
    Ok(())
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
///
/// # Errors
///
/// If the jemalloc statistics can not be read.
pub(crate) fn memory_usage() -> anyhow::Result<(f64, f64)> {
    epoch::advance().map_err(|e| anyhow!("{e:?}"))?;
    let allocated = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| anyhow!("{e:?}"))?;
    let resident = stats::resident::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| anyhow!("{e:?}"))?;
    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The raw count for the statistic.
/// * `elapsed` - The elapsed time in seconds, used to calculate the rate.
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
///
/// # Errors
///
/// If memory statistics are unavailable.
pub(crate) fn print_stats(report: &Report) -> anyhow::Result<()> {
    let (allocated, resident) = memory_usage()?;
    let elapsed_secs = report.solve_time.as_secs_f64();
    let missing = || "-".to_string();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Backend", report.backend);
    stat_line("Encode time (s)", format!("{:.3}", report.encode_time.as_secs_f64()));
    stat_line("Variables", report.problem.variables);
    stat_line("Constraints", report.problem.constraints);
    stat_line(
        "Clauses",
        report.problem.clauses.map_or_else(missing, |n| n.to_string()),
    );
    stat_line(
        "Literals",
        report.problem.literals.map_or_else(missing, |n| n.to_string()),
    );

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Solutions", report.boards.len(), elapsed_secs);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("Solve time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grid-puzzle").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_puzzle() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.common.rules(), Rules::default());
        assert_eq!(cli.common.backend, BackendKind::Varisat);
        assert!(!cli.common.stats);
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&["solve", "--all", "--row-target", "3", "--no-verify"]);
        assert!(matches!(cli.command, Some(Commands::Solve { all: true, limit: None })));
        assert_eq!(cli.common.row_target, 3);
        assert!(cli.common.no_verify);
    }

    #[test]
    fn check_parses_board() {
        let cli = parse(&["check", "--board", "110,011,101"]);
        match cli.command {
            Some(Commands::Check { board }) => assert_eq!(board, grid_puzzle::grid::KNOWN_SOLUTION),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["grid-puzzle", "check", "--board", "11,011,101"]).is_err());
    }

    #[test]
    fn limit_requires_all() {
        assert!(Cli::try_parse_from(["grid-puzzle", "solve", "--limit", "2"]).is_err());
    }

    #[test]
    fn limit_must_be_positive() {
        assert!(Cli::try_parse_from(["grid-puzzle", "solve", "--all", "--limit", "0"]).is_err());
        let cli = parse(&["solve", "--all", "--limit", "2"]);
        match cli.command {
            Some(Commands::Solve { all: true, limit }) => {
                assert_eq!(limit.map(NonZeroUsize::get), Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn search_reports_problem_size() {
        let report = search(&parse(&[]).common, Some(1)).unwrap();
        assert_eq!(report.backend, "varisat");
        assert_eq!(report.boards.len(), 1);
        assert_eq!(report.problem.variables, 9);
        assert_eq!(report.problem.constraints, 7);
        assert!(report.problem.clauses.is_some());
        assert!(report.dump.is_none());
    }

    #[test]
    fn search_enumerates() {
        let report = search(&parse(&[]).common, None).unwrap();
        assert_eq!(report.boards.len(), 6);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
