#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Partial assignments of truth values to variables.
//!
//! An assignment grows monotonically along one search path. It never holds
//! two values for the same variable: `record` keeps the first value written,
//! and `union` joins two assignments whose key sets are disjoint.

use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<V: Variable>(FxHashMap<V, bool>);

impl<V: Variable> Default for Assignment<V> {
    fn default() -> Self {
        Self(FxHashMap::default())
    }
}

impl<V: Variable> Assignment<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn value(&self, variable: &V) -> Option<bool> {
        self.0.get(variable).copied()
    }

    /// Truth value of `literal` under this assignment, `None` while its
    /// variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, literal: &Literal<V>) -> Option<bool> {
        self.value(literal.variable())
            .map(|value| value == literal.polarity())
    }

    /// Records `value` for `variable` unless it already has one.
    ///
    /// Returns `true` when the value was newly recorded. An existing value is
    /// kept even if it differs from `value`.
    pub fn record(&mut self, variable: V, value: bool) -> bool {
        match self.0.entry(variable) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Makes `literal` true, keeping any value already recorded.
    pub fn record_literal(&mut self, literal: &Literal<V>) -> bool {
        self.record(literal.variable().clone(), literal.polarity())
    }

    /// Sets `variable` to `value`, overwriting.
    pub fn assign(&mut self, variable: V, value: bool) {
        self.0.insert(variable, value);
    }

    /// Merges `other` into `self`.
    ///
    /// The two key sets must be disjoint: a sub-solution never mentions a
    /// variable that was eliminated before recursing. Debug builds assert
    /// this; release builds keep the value already in `self`.
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        for (variable, value) in other.0 {
            debug_assert!(
                !self.0.contains_key(&variable),
                "assignment union over overlapping variable {variable:?}"
            );
            self.0.entry(variable).or_insert(value);
        }
        self
    }

    /// Variables and their values, ordered by variable.
    pub fn iter(&self) -> impl Iterator<Item = (&V, bool)> {
        self.0.iter().map(|(k, v)| (k, *v)).sorted_by(|a, b| a.0.cmp(b.0))
    }

    /// Variables assigned true, in order.
    #[must_use]
    pub fn true_variables(&self) -> Vec<&V> {
        self.iter()
            .filter_map(|(variable, value)| value.then_some(variable))
            .collect()
    }

    /// The assignment as literals, ordered by variable.
    #[must_use]
    pub fn literals(&self) -> Vec<Literal<V>> {
        self.iter()
            .map(|(variable, value)| Literal::new(variable.clone(), value))
            .collect()
    }
}

impl<V: Variable> FromIterator<(V, bool)> for Assignment<V> {
    fn from_iter<T: IntoIterator<Item = (V, bool)>>(iter: T) -> Self {
        let mut assignment = Self::new();
        for (variable, value) in iter {
            assignment.record(variable, value);
        }
        assignment
    }
}

impl<V: Variable + Display> Display for Assignment<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals().iter().join(" "))
    }
}
