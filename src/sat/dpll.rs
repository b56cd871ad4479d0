#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines the main DPLL (Davis-Putnam-Logemann-Loveland) SAT solver.
//!
//! The search is a depth-first walk over partial assignments, driven by an
//! explicit stack of frames instead of the call stack, so deep searches are
//! limited by memory rather than by thread stack size.
//!
//! Each frame holds the formula of its parent, the literal it assumes, the
//! assignment collected on the path so far, and its depth. Processing a frame:
//! 1.  **Assume:** simplify the parent formula with the frame's literal and
//!     record the literal in the path assignment.
//! 2.  **Terminal checks:** an empty formula means the path assignment
//!     satisfies the input; an empty clause means this branch is dead.
//! 3.  **Unit propagation:** apply unit clauses until none remain, re-checking
//!     both terminal conditions after every single application.
//! 4.  **Decision:** branch on the first literal of the first remaining clause.
//!     Two child frames share the stalled formula. The frame asserting the
//!     literal as stated goes on top of the stack, so it is explored first,
//!     and the frame asserting its negation is the backtrack point.
//!
//! Popping a frame that fails simply moves on to the next one; the discarded
//! assignment belonged to that frame alone.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::propagation::{Propagation, propagate};
use crate::sat::simplify::simplify;
use crate::sat::solver::{SolutionStats, SolveError, Solver, SolverConfig};
use std::rc::Rc;
use tracing::debug;

/// One pending node of the search tree.
#[derive(Debug, Clone)]
struct Frame<V: Variable> {
    /// The formula this node starts from, before `assume` is applied.
    formula: Rc<Cnf<V>>,
    /// Branch literal taken to reach this node; `None` at the root.
    assume: Option<Literal<V>>,
    assignment: Assignment<V>,
    depth: usize,
}

/// Iterative DPLL solver.
#[derive(Debug, Clone)]
pub struct Dpll<V: Variable> {
    /// The formula being solved. Never modified by a search.
    pub cnf: Cnf<V>,
    pub config: SolverConfig,
    stats: SolutionStats,
}

impl<V: Variable> Solver<V> for Dpll<V> {
    fn with_config(cnf: Cnf<V>, config: SolverConfig) -> Self {
        Self {
            cnf,
            config,
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Result<Option<Assignment<V>>, SolveError> {
        self.stats = SolutionStats::default();

        let mut stack = vec![Frame {
            formula: Rc::new(self.cnf.clone()),
            assume: None,
            assignment: Assignment::new(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            let Frame {
                formula,
                assume,
                mut assignment,
                depth,
            } = frame;

            self.stats.max_depth = self.stats.max_depth.max(depth);

            let formula = match assume {
                Some(literal) => {
                    let simplified = simplify(&formula, &literal);
                    let (variable, value) = literal.into_parts();
                    assignment.assign(variable, value);
                    simplified
                }
                None => Rc::unwrap_or_clone(formula),
            };

            if formula.is_empty() {
                debug!(depth, "formula satisfied");
                return Ok(Some(assignment));
            }

            if formula.has_empty_clause() {
                self.stats.backtracks += 1;
                continue;
            }

            let formula = match propagate(formula, &mut assignment, &mut self.stats) {
                Propagation::Satisfied => {
                    debug!(depth, "formula satisfied by propagation");
                    return Ok(Some(assignment));
                }
                Propagation::Conflict => {
                    self.stats.backtracks += 1;
                    debug!(depth, "conflict during propagation, backtracking");
                    continue;
                }
                Propagation::Stalled(formula) => formula,
            };

            let Some(branch) = formula.first_literal().cloned() else {
                return Ok(Some(assignment));
            };

            if let Some(limit) = self.config.max_depth {
                if depth >= limit {
                    return Err(SolveError::DepthLimitExceeded { limit });
                }
            }

            self.stats.decisions += 1;
            debug!(depth, ?branch, clauses = formula.len(), "branching");

            let formula = Rc::new(formula);
            stack.push(Frame {
                formula: Rc::clone(&formula),
                assume: Some(branch.negated()),
                assignment: assignment.clone(),
                depth: depth + 1,
            });
            stack.push(Frame {
                formula,
                assume: Some(branch),
                assignment,
                depth: depth + 1,
            });
        }

        debug!(stats = ?self.stats, "formula unsatisfiable");
        Ok(None)
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}
