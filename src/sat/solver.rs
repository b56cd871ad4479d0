#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The interface shared by the search engines.
//!
//! A search ends in one of three ways: a satisfying assignment
//! (`Ok(Some(_))`), unsatisfiability (`Ok(None)`, an ordinary outcome), or a
//! resource failure when a configured depth limit is hit (`Err(_)`).

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::dpll::Dpll;
use crate::sat::literal::Variable;
use thiserror::Error;

/// Settings for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    /// Largest number of branching decisions allowed on one search path.
    /// `None` leaves the search unbounded.
    pub max_depth: Option<usize>,
}

impl SolverConfig {
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The search needed to branch deeper than `SolverConfig::max_depth`.
    #[error("search exceeded the depth limit of {limit} decisions")]
    DepthLimitExceeded { limit: usize },
}

/// Counters collected over one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branching decisions taken.
    pub decisions: usize,
    /// Unit literals applied during propagation.
    pub propagations: usize,
    /// Search nodes that ended in a contradiction.
    pub backtracks: usize,
    /// Deepest decision level reached.
    pub max_depth: usize,
}

pub trait Solver<V: Variable>: Sized {
    fn new(cnf: Cnf<V>) -> Self {
        Self::with_config(cnf, SolverConfig::default())
    }

    fn with_config(cnf: Cnf<V>, config: SolverConfig) -> Self;

    /// Runs the search from scratch.
    ///
    /// # Errors
    ///
    /// `SolveError::DepthLimitExceeded` when a depth limit is configured and
    /// the search needs to branch past it.
    fn solve(&mut self) -> Result<Option<Assignment<V>>, SolveError>;

    fn stats(&self) -> SolutionStats;
}

/// Decides `formula`, returning a satisfying assignment or `None` when it is
/// unsatisfiable.
///
/// Uses the explicit-stack engine with no depth limit, so it never fails and
/// its memory use, not the call stack, bounds the size of solvable inputs.
#[must_use]
pub fn solve<V: Variable>(formula: &Cnf<V>) -> Option<Assignment<V>> {
    match Dpll::new(formula.clone()).solve() {
        Ok(solution) => solution,
        Err(SolveError::DepthLimitExceeded { .. }) => {
            unreachable!("an unbounded search has no depth limit to exceed")
        }
    }
}
