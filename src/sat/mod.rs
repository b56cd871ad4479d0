#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Satisfiability of CNF formulas by DPLL search with unit propagation.

pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod dimacs;
pub mod dpll;
pub mod literal;
pub mod propagation;
pub mod recursive;
pub mod simplify;
pub mod solver;
