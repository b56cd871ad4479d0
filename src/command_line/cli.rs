#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use sat_sudoku::sat::assignment::Assignment;
use sat_sudoku::sat::cnf::Cnf;
use sat_sudoku::sat::dimacs::{parse_file, parse_textual_cnf, to_dimacs};
use sat_sudoku::sat::dpll::Dpll;
use sat_sudoku::sat::literal::Variable;
use sat_sudoku::sat::recursive::RecursiveDpll;
use sat_sudoku::sat::solver::{SolutionStats, Solver, SolverConfig};
use sat_sudoku::sudoku;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing_subscriber::EnvFilter;

/// Defines the command-line interface for the solver.
#[derive(Parser, Debug)]
#[command(name = "sat_sudoku", version, about = "A DPLL SAT solver and Sudoku solver")]
pub(crate) struct Cli {
    /// Path to a DIMACS .cnf file, or a directory of them, to solve when no
    /// subcommand is given.
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format, or every `.cnf` file under a directory.
    File {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are space-separated and 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle by encoding it as a CNF formula.
    Sudoku {
        /// Path to the puzzle: one row per line, `0`, `.` or `_` for empty cells.
        #[arg(long)]
        path: PathBuf,

        /// Also write the encoding in DIMACS format next to the puzzle file.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    const fn common(&self) -> Option<&CommonOptions> {
        match self {
            Self::File { common, .. } | Self::Text { common, .. } | Self::Sudoku { common, .. } => {
                Some(common)
            }
            Self::Completions { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SolverType {
    /// Depth-first search over an explicit stack.
    #[default]
    Dpll,
    /// Depth-first search by recursion.
    Recursive,
}

impl Display for SolverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dpll => write!(f, "dpll"),
            Self::Recursive => write!(f, "recursive"),
        }
    }
}

/// Options shared by every solving command.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging of the search. `RUST_LOG` overrides this.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a found assignment against the formula (`--verify false` to skip).
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving (`--stats false` to skip).
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    #[arg(long, default_value_t = SolverType::Dpll)]
    pub(crate) solver: SolverType,

    /// Give up once a search path needs more than this many decisions.
    #[arg(long)]
    pub(crate) max_depth: Option<usize>,
}

impl CommonOptions {
    const fn config(&self) -> SolverConfig {
        SolverConfig {
            max_depth: self.max_depth,
        }
    }
}

/// Everything measured around one search.
struct Outcome<V: Variable> {
    solution: Option<Assignment<V>>,
    elapsed: Duration,
    stats: SolutionStats,
}

/// Parses the command line and runs it.
///
/// # Errors
///
/// A message describing the first input or solver failure.
pub(crate) fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let debug = cli.common.debug
        || cli
            .command
            .as_ref()
            .and_then(Commands::common)
            .is_some_and(|c| c.debug);
    init_logging(debug);

    match cli.command {
        None => match cli.path {
            Some(path) => solve_path(&path, &cli.common),
            None => Err("No command provided. Use --help for more information.".to_string()),
        },
        Some(Commands::File { path, common }) => solve_path(&path, &common),
        Some(Commands::Text { input, common }) => {
            let time = Instant::now();
            let cnf = parse_textual_cnf(&input.replace("\\n", "\n")).map_err(|e| e.to_string())?;
            solve_and_report(&cnf, &common, None, time.elapsed())
        }
        Some(Commands::Sudoku {
            path,
            export_dimacs,
            common,
        }) => solve_sudoku(&path, export_dimacs, &common),
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if path.is_dir() {
        return solve_dir(path, common);
    }

    let time = Instant::now();
    let cnf = parse_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
    solve_and_report(&cnf, common, Some(path), time.elapsed())
}

/// Solves every `.cnf` and `.sudoku` file under `path`.
///
/// # Errors
///
/// Stops at the first file that cannot be parsed or solved.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_some_and(|ext| ext == "sudoku") {
            solve_sudoku(file_path, false, common)?;
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "cnf") {
            eprintln!("Skipping non-CNF file: {}", file_path.display());
            continue;
        }

        let time = Instant::now();
        let cnf = parse_file(file_path).map_err(|e| format!("{}: {e}", file_path.display()))?;
        solve_and_report(&cnf, common, Some(file_path), time.elapsed())?;
    }

    Ok(())
}

fn solve<V: Variable, S: Solver<V>>(
    cnf: &Cnf<V>,
    config: SolverConfig,
) -> Result<Outcome<V>, String> {
    let time = Instant::now();
    let mut solver = S::with_config(cnf.clone(), config);
    let solution = solver.solve().map_err(|e| e.to_string())?;

    Ok(Outcome {
        solution,
        elapsed: time.elapsed(),
        stats: solver.stats(),
    })
}

fn solve_with_options<V: Variable>(
    cnf: &Cnf<V>,
    common: &CommonOptions,
    label: Option<&Path>,
) -> Result<Outcome<V>, String> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    tracing::debug!(
        solver = %common.solver,
        clauses = cnf.len(),
        literals = cnf.num_literals(),
        "starting search"
    );

    match common.solver {
        SolverType::Dpll => solve::<V, Dpll<V>>(cnf, common.config()),
        SolverType::Recursive => solve::<V, RecursiveDpll<V>>(cnf, common.config()),
    }
}

/// Solves `cnf` and prints verification, statistics and the answer as requested.
///
/// # Errors
///
/// If the search fails or the assignment does not satisfy the formula.
pub(crate) fn solve_and_report<V: Variable + Display>(
    cnf: &Cnf<V>,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), String> {
    let outcome = solve_with_options(cnf, common, label)?;

    if common.verify {
        verify_solution(cnf, outcome.solution.as_ref())?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(parse_time, cnf, &outcome, allocated, resident);
    }

    match &outcome.solution {
        Some(solution) => {
            if common.print_solution {
                println!("Solution: {solution}");
            }
            println!("\nSATISFIABLE");
        }
        None => println!("\nUNSATISFIABLE"),
    }

    Ok(())
}

/// Checks `solution` against `cnf`.
///
/// # Errors
///
/// If some clause is left unsatisfied.
pub(crate) fn verify_solution<V: Variable>(
    cnf: &Cnf<V>,
    solution: Option<&Assignment<V>>,
) -> Result<(), String> {
    match solution {
        Some(assignment) => {
            let ok = cnf.verify(assignment);
            println!("Verified: {ok:?}");
            if ok {
                Ok(())
            } else {
                Err("Solution failed verification!".to_string())
            }
        }
        None => {
            println!("UNSAT");
            Ok(())
        }
    }
}

/// Allocated and resident memory in MiB.
fn memory_usage() -> Result<(f64, f64), String> {
    epoch::advance().map_err(|e| e.to_string())?;
    let allocated = stats::allocated::read().map_err(|e| e.to_string())?;
    let resident = stats::resident::read().map_err(|e| e.to_string())?;
    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

pub(crate) fn stat_line(label: &str, value: impl Display) {
    println!("|  {label:<28} {value:>18}  |");
}

pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

fn print_stats<V: Variable>(
    parse_time: Duration,
    cnf: &Cnf<V>,
    outcome: &Outcome<V>,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = outcome.elapsed.as_secs_f64();
    let s = &outcome.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.variables().len());
    stat_line("Clauses", cnf.len());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Solves a Sudoku file.
///
/// # Errors
///
/// If the file is missing or malformed, or the search fails.
pub(crate) fn solve_sudoku(
    path: &Path,
    export_dimacs: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    if !path.is_file() {
        return Err(format!("Sudoku file does not exist: {}", path.display()));
    }

    let time = Instant::now();
    let puzzle = sudoku::solver::parse_sudoku_file(path)
        .map_err(|e| format!("Error parsing Sudoku file: {e}"))?;
    println!("Parsed Sudoku:\n{puzzle}");

    let cnf = puzzle.to_cnf();

    if export_dimacs {
        let dimacs_path = format!("{}.cnf", path.display());
        std::fs::write(&dimacs_path, to_dimacs(&puzzle.to_dimacs_cnf()))
            .map_err(|e| format!("Unable to write {dimacs_path}: {e}"))?;
        println!("DIMACS written to: {dimacs_path}");
    }

    let parse_time = time.elapsed();
    let outcome = solve_with_options(&cnf, common, Some(path))?;

    if common.verify {
        verify_solution(&cnf, outcome.solution.as_ref())?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(parse_time, &cnf, &outcome, allocated, resident);
    }

    match puzzle.decode(outcome.solution.as_ref()) {
        Some(board) => println!("Solution:\n{board}"),
        None => println!("No solution found"),
    }

    Ok(())
}
