#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals: a variable paired with the truth value it is required to take.
//!
//! Variables are opaque keys. Anything that is cloneable, totally ordered and
//! hashable can name a variable, from plain integers (DIMACS input) to
//! structured keys such as a Sudoku `(row, column, value)` cell.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Bound required of a variable identity.
///
/// `Ord` gives deterministic iteration over assignments, `Hash` lets the
/// variable key an assignment map.
pub trait Variable: Clone + Debug + Eq + Ord + Hash {}

impl<T: Clone + Debug + Eq + Ord + Hash> Variable for T {}

/// A variable together with its desired polarity.
///
/// `Literal::new(x, true)` is satisfied when `x` is true, `Literal::new(x, false)`
/// when `x` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal<V> {
    variable: V,
    polarity: bool,
}

impl<V> Literal<V> {
    #[must_use]
    pub const fn new(variable: V, polarity: bool) -> Self {
        Self { variable, polarity }
    }

    #[must_use]
    pub const fn variable(&self) -> &V {
        &self.variable
    }

    #[must_use]
    pub const fn polarity(&self) -> bool {
        self.polarity
    }

    /// Consumes the literal, returning its variable and polarity.
    #[must_use]
    pub fn into_parts(self) -> (V, bool) {
        (self.variable, self.polarity)
    }
}

impl<V: Clone> Literal<V> {
    /// The same variable with the opposite polarity.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self::new(self.variable.clone(), !self.polarity)
    }
}

impl<V> From<(V, bool)> for Literal<V> {
    fn from((variable, polarity): (V, bool)) -> Self {
        Self::new(variable, polarity)
    }
}

/// DIMACS convention: the sign of the integer is the polarity.
///
/// `0` is the clause terminator in DIMACS and never reaches here.
impl From<i32> for Literal<u32> {
    fn from(value: i32) -> Self {
        Self::new(value.unsigned_abs(), value.is_positive())
    }
}

impl<V: Display> Display for Literal<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "-{}", self.variable)
        }
    }
}
