#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form.
//!
//! A `Cnf` is an ordered sequence of clauses, interpreted as their logical AND.
//! The empty formula is trivially satisfied; a formula containing the empty
//! clause is unsatisfiable whatever else it contains. Formulas are values:
//! simplification always builds a new `Cnf` and never touches its input.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cnf<V> {
    pub clauses: Vec<Clause<V>>,
}

impl<V> Cnf<V> {
    #[must_use]
    pub fn new(clauses: impl IntoIterator<Item = Clause<V>>) -> Self {
        Self {
            clauses: clauses.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            clauses: Vec::with_capacity(capacity),
        }
    }

    /// No clauses left: nothing constrains the variables any more.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// A formula holding the empty clause cannot be satisfied.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause<V>> {
        self.clauses.iter()
    }

    pub fn push(&mut self, clause: Clause<V>) {
        self.clauses.push(clause);
    }

    /// First literal of the first clause, the branching choice of the solvers.
    #[must_use]
    pub fn first_literal(&self) -> Option<&Literal<V>> {
        self.clauses.first().and_then(Clause::first)
    }

    /// Rebuilds the formula over a different variable type, clause and
    /// literal order preserved.
    #[must_use]
    pub fn map_variables<W>(&self, mut f: impl FnMut(&V) -> W) -> Cnf<W> {
        Cnf::new(self.clauses.iter().map(|clause| {
            clause
                .iter()
                .map(|lit| Literal::new(f(lit.variable()), lit.polarity()))
                .collect::<Clause<W>>()
        }))
    }
}

impl<V: Variable> Cnf<V> {
    /// Every variable the formula mentions, sorted and without repeats.
    #[must_use]
    pub fn variables(&self) -> Vec<V> {
        self.clauses
            .iter()
            .flat_map(|c| c.iter().map(|l| l.variable().clone()))
            .sorted()
            .dedup()
            .collect()
    }

    /// Checks that every clause has a literal made true by `assignment`.
    ///
    /// A variable missing from the assignment satisfies nothing, so a clause
    /// whose variables are all absent fails verification.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment<V>) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|lit| assignment.literal_value(lit) == Some(true))
        })
    }
}

impl<V> FromIterator<Clause<V>> for Cnf<V> {
    fn from_iter<T: IntoIterator<Item = Clause<V>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Vec<i32>>> for Cnf<u32> {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        clauses.into_iter().map(Clause::from).collect()
    }
}

impl<V> From<Vec<Vec<(V, bool)>>> for Cnf<V> {
    fn from(clauses: Vec<Vec<(V, bool)>>) -> Self {
        clauses.into_iter().map(Clause::from).collect()
    }
}

impl<V> From<Vec<Clause<V>>> for Cnf<V> {
    fn from(clauses: Vec<Clause<V>>) -> Self {
        Self { clauses }
    }
}

impl<'a, V> IntoIterator for &'a Cnf<V> {
    type Item = &'a Clause<V>;
    type IntoIter = std::slice::Iter<'a, Clause<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl<V: Display> Display for Cnf<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "⊤");
        }
        write!(f, "{}", self.clauses.iter().join(" ∧ "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_formula() {
        let cnf = Cnf::<u32>::default();
        assert!(cnf.is_empty());
        assert!(!cnf.has_empty_clause());
        assert!(cnf.verify(&Assignment::new()));
    }

    #[test]
    fn test_has_empty_clause() {
        let cnf = Cnf::<u32>::from(vec![vec![1, 2], vec![]]);
        assert!(cnf.has_empty_clause());
        assert!(!cnf.is_empty());
    }

    #[test]
    fn test_variables_sorted_unique() {
        let cnf = Cnf::<u32>::from(vec![vec![3, -1], vec![1, 2, -3]]);
        assert_eq!(cnf.variables(), vec![1, 2, 3]);
        assert_eq!(cnf.num_literals(), 5);
        assert_eq!(cnf.len(), 2);
    }

    #[test]
    fn test_first_literal() {
        let cnf = Cnf::from(vec![vec![("b", false), ("a", true)], vec![("c", true)]]);
        assert_eq!(cnf.first_literal(), Some(&Literal::new("b", false)));
        assert_eq!(Cnf::<u32>::default().first_literal(), None);
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::from(vec![vec![("a", true), ("b", false)], vec![("c", true)]]);

        let mut good = Assignment::new();
        good.assign("b", false);
        good.assign("c", true);
        assert!(cnf.verify(&good));

        let mut partial = Assignment::new();
        partial.assign("c", true);
        assert!(!cnf.verify(&partial));
    }

    #[test]
    fn test_map_variables() {
        let cnf = Cnf::from(vec![vec![("x", true), ("yy", false)]]);
        let mapped = cnf.map_variables(|v| u32::try_from(v.len()).unwrap_or(0));
        assert_eq!(mapped, Cnf::<u32>::from(vec![vec![1, -2]]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cnf::<u32>::from(vec![vec![1, -2], vec![3]]).to_string(), "(1 ∨ -2) ∧ (3)");
        assert_eq!(Cnf::<u32>::default().to_string(), "⊤");
    }
}
