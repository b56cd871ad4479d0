#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation to fixpoint.
//!
//! Shared by both search engines so that they take exactly the same steps on
//! the same formula.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;
use crate::sat::simplify::{find_unit_clauses, simplify};
use crate::sat::solver::SolutionStats;
use tracing::trace;

/// Where propagation left the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Propagation<V> {
    /// Every clause was satisfied by the propagated literals.
    Satisfied,
    /// Some clause lost all its literals.
    Conflict,
    /// No unit clause remains; the formula is non-empty and has no empty clause.
    Stalled(Cnf<V>),
}

/// Repeatedly applies every unit clause of `formula` until none is left.
///
/// Unit literals of one scan are applied in formula order. After each single
/// application the formula is checked for an empty clause (conflict) and for
/// emptiness (satisfied). Propagated literals go into `assignment` on a
/// first-write-wins basis; a later unit clause demanding the opposite value
/// of an already propagated variable shows up as an empty clause instead.
///
/// The caller is expected to have handled the terminal cases of the input.
pub fn propagate<V: Variable>(
    mut formula: Cnf<V>,
    assignment: &mut Assignment<V>,
    stats: &mut SolutionStats,
) -> Propagation<V> {
    loop {
        let units = find_unit_clauses(&formula);
        if units.is_empty() {
            return Propagation::Stalled(formula);
        }

        for literal in units {
            formula = simplify(&formula, &literal);
            stats.propagations += 1;
            trace!(?literal, clauses = formula.len(), "propagated unit literal");

            if formula.has_empty_clause() {
                return Propagation::Conflict;
            }

            assignment.record_literal(&literal);

            if formula.is_empty() {
                return Propagation::Satisfied;
            }
        }
    }
}
