#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Recursive DPLL.
//!
//! Every call works on its own simplified copy of the formula and builds the
//! assignment for that sub-formula only; a successful branch joins the
//! caller's propagated literals, the branch literal and the sub-solution. It
//! explores the search tree in the same order as [`crate::sat::dpll::Dpll`]
//! and returns the same assignment.
//!
//! Recursion depth grows with the number of decisions on a path. Each level
//! checks the remaining stack and moves onto a freshly allocated segment when
//! it runs low, so depth is limited by memory, or by
//! [`SolverConfig::max_depth`] when one is set.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;
use crate::sat::propagation::{Propagation, propagate};
use crate::sat::simplify::simplify;
use crate::sat::solver::{SolutionStats, SolveError, Solver, SolverConfig};
use tracing::debug;

/// Stack space that must remain before descending another level (64 KiB).
const MIN_STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment (2 MiB).
const STACK_GROWTH_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RecursiveDpll<V: Variable> {
    pub cnf: Cnf<V>,
    pub config: SolverConfig,
    stats: SolutionStats,
}

impl<V: Variable> Solver<V> for RecursiveDpll<V> {
    fn with_config(cnf: Cnf<V>, config: SolverConfig) -> Self {
        Self {
            cnf,
            config,
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Result<Option<Assignment<V>>, SolveError> {
        self.stats = SolutionStats::default();
        let result = self.search(self.cnf.clone(), 0)?;
        debug!(stats = ?self.stats, satisfiable = result.is_some(), "search finished");
        Ok(result)
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<V: Variable> RecursiveDpll<V> {
    fn search(
        &mut self,
        formula: Cnf<V>,
        depth: usize,
    ) -> Result<Option<Assignment<V>>, SolveError> {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.search_impl(formula, depth)
        })
    }

    /// One level of the search; recursion goes through [`Self::search`].
    fn search_impl(
        &mut self,
        formula: Cnf<V>,
        depth: usize,
    ) -> Result<Option<Assignment<V>>, SolveError> {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if formula.is_empty() {
            return Ok(Some(Assignment::new()));
        }

        if formula.has_empty_clause() {
            self.stats.backtracks += 1;
            return Ok(None);
        }

        let mut solution = Assignment::new();

        let formula = match propagate(formula, &mut solution, &mut self.stats) {
            Propagation::Satisfied => return Ok(Some(solution)),
            Propagation::Conflict => {
                self.stats.backtracks += 1;
                return Ok(None);
            }
            Propagation::Stalled(formula) => formula,
        };

        let Some(branch) = formula.first_literal().cloned() else {
            return Ok(Some(solution));
        };

        if let Some(limit) = self.config.max_depth {
            if depth >= limit {
                return Err(SolveError::DepthLimitExceeded { limit });
            }
        }

        self.stats.decisions += 1;
        debug!(depth, ?branch, clauses = formula.len(), "branching");

        for literal in [branch.clone(), branch.negated()] {
            let branch_formula = simplify(&formula, &literal);

            if let Some(sub_solution) = self.search(branch_formula, depth + 1)? {
                let (variable, value) = literal.into_parts();
                solution.assign(variable, value);
                return Ok(Some(solution.union(sub_solution)));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::dpll::Dpll;
    use crate::sat::literal::Literal;

    #[test]
    fn test_terminal_cases() {
        let mut empty = RecursiveDpll::new(Cnf::<u32>::default());
        assert_eq!(empty.solve(), Ok(Some(Assignment::new())));

        let mut contradiction =
            RecursiveDpll::new(Cnf::<u32>::from(vec![vec![1], vec![2], vec![]]));
        assert_eq!(contradiction.solve(), Ok(None));

        let mut units = RecursiveDpll::new(Cnf::<u32>::from(vec![vec![1], vec![-1]]));
        assert_eq!(units.solve(), Ok(None));
    }

    #[test]
    fn test_solution_joins_propagation_branch_and_subsolution() {
        let cnf = Cnf::from(vec![
            vec![("u", true)],
            vec![("u", false), ("a", true), ("b", true)],
            vec![("a", false), ("c", true)],
        ]);
        let mut solver = RecursiveDpll::new(cnf.clone());
        let solution = solver.solve().expect("unbounded").expect("satisfiable");

        assert!(cnf.verify(&solution));
        assert_eq!(
            solution.literals(),
            vec![
                Literal::new("a", true),
                Literal::new("c", true),
                Literal::new("u", true),
            ]
        );
    }

    #[test]
    fn test_matches_iterative_engine() {
        let cnf = Cnf::<u32>::from(vec![
            vec![1, 2, -3],
            vec![-1, 3],
            vec![-2, -3, 4],
            vec![-4, -1],
            vec![3, 4],
            vec![-2, 1],
        ]);

        let mut recursive = RecursiveDpll::new(cnf.clone());
        let mut iterative = Dpll::new(cnf);

        assert_eq!(recursive.solve(), iterative.solve());
        assert_eq!(recursive.stats(), iterative.stats());
    }

    #[test]
    fn test_deep_search_on_default_stack() {
        // Independent binary clauses: one decision per clause, all nested.
        let n: i32 = 3000;
        let cnf = Cnf::<u32>::from((1..=n).map(|i| vec![i, n + i]).collect::<Vec<_>>());
        let mut solver = RecursiveDpll::new(cnf.clone());

        let solution = solver.solve().expect("unbounded").expect("satisfiable");

        assert!(cnf.verify(&solution));
        assert_eq!(solver.stats().decisions, 3000);
        assert_eq!(solver.stats().max_depth, 3000);
    }

    #[test]
    fn test_depth_limit() {
        let cnf = Cnf::<u32>::from(vec![vec![1, 2], vec![-1, -2], vec![3, 4], vec![-3, -4]]);

        let mut bounded = RecursiveDpll::with_config(cnf.clone(), SolverConfig::with_max_depth(1));
        assert_eq!(
            bounded.solve(),
            Err(SolveError::DepthLimitExceeded { limit: 1 })
        );

        let mut enough = RecursiveDpll::with_config(cnf, SolverConfig::with_max_depth(2));
        assert!(enough.solve().expect("within limit").is_some());
    }
}
