#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formula simplification under a literal known to be true.
//!
//! This is the only way the solvers shrink a formula. Both functions are pure:
//! the input formula is borrowed and a fresh value is returned.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};

/// Simplifies `formula` under the assumption that `literal` holds.
///
/// For each clause, in order:
/// - a clause containing `literal` itself is satisfied and dropped;
/// - otherwise every occurrence of the literal's variable (necessarily with
///   the opposite polarity) is struck out, the other literals keeping their
///   relative order. This may leave the empty clause, which the caller reads
///   as a contradiction;
/// - clauses not mentioning the variable are copied unchanged.
///
/// The returned formula never mentions the literal's variable.
#[must_use]
pub fn simplify<V: Variable>(formula: &Cnf<V>, literal: &Literal<V>) -> Cnf<V> {
    let variable = literal.variable();
    let mut simplified = Cnf::with_capacity(formula.len());

    for clause in formula {
        if clause.contains(literal) {
            continue;
        }

        if clause.mentions(variable) {
            simplified.push(
                clause
                    .iter()
                    .filter(|l| l.variable() != variable)
                    .cloned()
                    .collect::<Clause<V>>(),
            );
        } else {
            simplified.push(clause.clone());
        }
    }

    simplified
}

/// Collects the literal of every unit clause, in formula order.
///
/// Accepts either a formula or `None`; an absent formula has no unit clauses.
#[must_use]
pub fn find_unit_clauses<'a, V: Variable + 'a>(
    formula: impl Into<Option<&'a Cnf<V>>>,
) -> Vec<Literal<V>> {
    formula.into().map_or_else(Vec::new, |cnf| {
        cnf.iter()
            .filter(|c| c.is_unit())
            .map(|c| c[0].clone())
            .collect()
    })
}
