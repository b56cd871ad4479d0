#![deny(missing_docs)]
//! This crate decides satisfiability of boolean formulas in conjunctive normal
//! form and solves Sudoku puzzles by encoding them as such formulas.

/// The `sat` module implements the SAT solver, which determines the satisfiability of Boolean
/// formulas and produces a satisfying assignment when there is one.
#[allow(missing_docs)]
pub mod sat;

/// The `sudoku` module encodes Sudoku grids of any perfect-square size as CNF formulas and
/// decodes satisfying assignments back into grids.
#[allow(missing_docs)]
pub mod sudoku;
