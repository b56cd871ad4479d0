#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku as a SAT problem.

/// Board parsing and validation, the CNF encoding and decoding of assignments back into grids.
pub mod solver;
