//! # `sat_sudoku`
//!
//! Command-line front end for the DPLL solver in the `sat_sudoku` library.
//! It solves formulas in DIMACS CNF format, formulas typed on the command
//! line, and Sudoku puzzles of any perfect-square size.
//!
//! ## Usage
//!
//! ```sh
//! sat_sudoku [OPTIONS] [PATH] [COMMAND]
//! ```
//!
//! A bare `PATH` is solved as a DIMACS file, or as a directory of `.cnf` and
//! `.sudoku` files.
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a DIMACS file or directory.
//!     ```sh
//!     sat_sudoku file --path <path_to_cnf_file> [OPTIONS]
//!     ```
//!
//! 2.  **`text`**: Solve a formula given as text.
//!     ```sh
//!     sat_sudoku text --input "1 -2 0\n2 3 0" [OPTIONS]
//!     ```
//!
//! 3.  **`sudoku`**: Solve a Sudoku puzzle, optionally writing its encoding
//!     as `<path>.cnf`.
//!     ```sh
//!     sat_sudoku sudoku --path <path_to_sudoku_file> --export-dimacs [OPTIONS]
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Log the search at debug level (`RUST_LOG` takes precedence).
//! -   `-v, --verify`: Check the assignment against the formula (default: `true`).
//! -   `-s, --stats`: Print problem and search statistics (default: `true`).
//! -   `-p, --print-solution`: Print the satisfying assignment.
//! -   `--solver <dpll|recursive>`: Search engine (default: `dpll`).
//! -   `--max-depth <N>`: Fail instead of branching deeper than `N` decisions.

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    if let Err(e) = command_line::cli::run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
