#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A clause is the disjunction of its literals.

use crate::sat::literal::Literal;
use core::ops::Index;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

/// Literal storage for a clause. The at-most-one constraints of grid
/// encodings are binary clauses, which stay inline.
pub type LiteralStorage<V> = SmallVec<[Literal<V>; 4]>;

/// An ordered sequence of literals, interpreted as their logical OR.
///
/// The empty clause can never be satisfied and marks a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause<V> {
    pub literals: LiteralStorage<V>,
}

impl<V> Clause<V> {
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal<V>>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            literals: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A unit clause forces the value of its only literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    #[must_use]
    pub fn first(&self) -> Option<&Literal<V>> {
        self.literals.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal<V>> {
        self.literals.iter()
    }

    pub fn push(&mut self, literal: Literal<V>) {
        self.literals.push(literal);
    }
}

impl<V: PartialEq> Clause<V> {
    /// Whether the clause holds `literal` exactly, same variable and same polarity.
    #[must_use]
    pub fn contains(&self, literal: &Literal<V>) -> bool {
        self.literals.contains(literal)
    }

    /// Whether any literal of the clause refers to `variable`.
    #[must_use]
    pub fn mentions(&self, variable: &V) -> bool {
        self.literals.iter().any(|l| l.variable() == variable)
    }
}

impl<V> Index<usize> for Clause<V> {
    type Output = Literal<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<V> FromIterator<Literal<V>> for Clause<V> {
    fn from_iter<T: IntoIterator<Item = Literal<V>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<V> From<Vec<Literal<V>>> for Clause<V> {
    fn from(literals: Vec<Literal<V>>) -> Self {
        Self::new(literals)
    }
}

impl<V> From<Vec<(V, bool)>> for Clause<V> {
    fn from(literals: Vec<(V, bool)>) -> Self {
        literals.into_iter().map(Literal::from).collect()
    }
}

impl From<Vec<i32>> for Clause<u32> {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().map(Literal::from).collect()
    }
}

impl From<&Vec<i32>> for Clause<u32> {
    fn from(literals: &Vec<i32>) -> Self {
        literals.iter().copied().map(Literal::from).collect()
    }
}

impl<'a, V> IntoIterator for &'a Clause<V> {
    type Item = &'a Literal<V>;
    type IntoIter = std::slice::Iter<'a, Literal<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl<V: Display> Display for Clause<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.literals.iter().join(" ∨ "))
    }
}
