//! Linear constraints over boolean variables.
//!
//! A [`LinearSum`] is an explicit list of `(variable, weight)` pairs. Each
//! variable contributes its weight when it is `true` and nothing when it is
//! `false`, so a sum with unit weights counts the true variables (an
//! indicator sum). A [`Constraint`] binds such a sum to a bound with one of
//! the [`Comparison`] operators.

use crate::smt::model::Model;
use smallvec::SmallVec;
use std::fmt;

/// Handle of a boolean declared in a [`crate::smt::session::Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(u32);

impl BoolVar {
    /// Builds a handle from its zero-based declaration index.
    ///
    /// # Panics
    ///
    /// If `index` does not fit in a `u32`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("variable index exceeds u32"))
    }

    /// Zero-based declaration index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// One-based DIMACS variable number.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn dimacs(self) -> i32 {
        self.0 as i32 + 1
    }
}

impl fmt::Display for BoolVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Relation between a sum and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `sum = bound`
    Eq,
    /// `sum >= bound`
    Ge,
    /// `sum <= bound`
    Le,
}

impl Comparison {
    /// Returns whether `lhs <op> rhs` holds.
    #[must_use]
    pub const fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ge => lhs >= rhs,
            Self::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ge => write!(f, ">="),
            Self::Le => write!(f, "<="),
        }
    }
}

/// A weighted sum of boolean variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinearSum {
    terms: SmallVec<[(BoolVar, i64); 8]>,
}

impl LinearSum {
    /// Creates an empty sum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of unit-weight indicators, one per variable.
    pub fn indicators(vars: impl IntoIterator<Item = BoolVar>) -> Self {
        vars.into_iter().map(|var| (var, 1)).collect()
    }

    /// Adds `weight * var` to the sum. Zero weights are dropped.
    #[must_use]
    pub fn with_term(mut self, var: BoolVar, weight: i64) -> Self {
        self.push(var, weight);
        self
    }

    /// Adds `weight * var` to the sum in place. Zero weights are dropped.
    pub fn push(&mut self, var: BoolVar, weight: i64) {
        if weight != 0 {
            self.terms.push((var, weight));
        }
    }

    /// The `(variable, weight)` pairs of this sum.
    #[must_use]
    pub fn terms(&self) -> &[(BoolVar, i64)] {
        &self.terms
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the sum has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the sum under `model`.
    #[must_use]
    pub fn evaluate(&self, model: &Model) -> i64 {
        self.terms
            .iter()
            .filter(|(var, _)| model.evaluate(*var))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Constrains the sum to equal `bound`.
    #[must_use]
    pub fn equals(self, bound: i64) -> Constraint {
        Constraint::new(self, Comparison::Eq, bound)
    }

    /// Constrains the sum to be at least `bound`.
    #[must_use]
    pub fn at_least(self, bound: i64) -> Constraint {
        Constraint::new(self, Comparison::Ge, bound)
    }

    /// Constrains the sum to be at most `bound`.
    #[must_use]
    pub fn at_most(self, bound: i64) -> Constraint {
        Constraint::new(self, Comparison::Le, bound)
    }
}

impl FromIterator<(BoolVar, i64)> for LinearSum {
    fn from_iter<T: IntoIterator<Item = (BoolVar, i64)>>(iter: T) -> Self {
        let mut sum = Self::new();
        for (var, weight) in iter {
            sum.push(var, weight);
        }
        sum
    }
}

impl fmt::Display for LinearSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (var, weight)) in self.terms.iter().enumerate() {
            match (i, *weight) {
                (0, 1) => write!(f, "{var}")?,
                (0, w) => write!(f, "{w}*{var}")?,
                (_, 1) => write!(f, " + {var}")?,
                (_, w) if w < 0 => write!(f, " - {}*{var}", -w)?,
                (_, w) => write!(f, " + {w}*{var}")?,
            }
        }
        Ok(())
    }
}

/// An assertion `sum <op> bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Left-hand side.
    pub sum: LinearSum,
    /// Relation to the bound.
    pub comparison: Comparison,
    /// Right-hand side.
    pub bound: i64,
}

impl Constraint {
    /// Creates `sum <comparison> bound`.
    #[must_use]
    pub const fn new(sum: LinearSum, comparison: Comparison, bound: i64) -> Self {
        Self {
            sum,
            comparison,
            bound,
        }
    }

    /// Constraint that rules out the assignment `model` gives to `vars`.
    ///
    /// At least one of `vars` must take a different value: the variables
    /// that are `false` in `model` enter with weight `1`, the `true` ones
    /// with weight `-1`, and the sum must reach `1 - trues`.
    #[must_use]
    pub fn blocking(model: &Model, vars: &[BoolVar]) -> Self {
        let mut sum = LinearSum::new();
        let mut trues = 0;
        for &var in vars {
            if model.evaluate(var) {
                sum.push(var, -1);
                trues += 1;
            } else {
                sum.push(var, 1);
            }
        }
        sum.at_least(1 - trues)
    }

    /// Returns whether `model` satisfies this constraint.
    #[must_use]
    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.comparison.holds(self.sum.evaluate(model), self.bound)
    }

    /// Iterates over the variables this constraint mentions.
    pub fn vars(&self) -> impl Iterator<Item = BoolVar> + '_ {
        self.sum.terms().iter().map(|(var, _)| *var)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.sum, self.comparison, self.bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(n: usize) -> Vec<BoolVar> {
        (0..n).map(BoolVar::from_index).collect()
    }

    #[test]
    fn dimacs_is_one_based() {
        assert_eq!(BoolVar::from_index(0).dimacs(), 1);
        assert_eq!(BoolVar::from_index(8).dimacs(), 9);
    }

    #[test]
    fn comparison_holds() {
        assert!(Comparison::Eq.holds(2, 2));
        assert!(!Comparison::Eq.holds(1, 2));
        assert!(Comparison::Ge.holds(3, 1));
        assert!(!Comparison::Ge.holds(0, 1));
        assert!(Comparison::Le.holds(1, 1));
        assert!(!Comparison::Le.holds(2, 1));
    }

    #[test]
    fn zero_weights_are_dropped() {
        let v = vars(2);
        let sum = LinearSum::new().with_term(v[0], 0).with_term(v[1], 3);
        assert_eq!(sum.terms(), &[(v[1], 3)]);
    }

    #[test]
    fn indicator_sum_counts_trues() {
        let v = vars(3);
        let model: Model = [true, false, true].into_iter().collect();
        let sum = LinearSum::indicators(v);
        assert_eq!(sum.evaluate(&model), 2);
        assert!(sum.clone().equals(2).is_satisfied_by(&model));
        assert!(sum.clone().at_least(1).is_satisfied_by(&model));
        assert!(!sum.at_most(1).is_satisfied_by(&model));
    }

    #[test]
    fn weighted_sum_evaluates() {
        let v = vars(3);
        let model: Model = [true, true, false].into_iter().collect();
        let sum: LinearSum = [(v[0], 2), (v[1], -3), (v[2], 5)].into_iter().collect();
        assert_eq!(sum.evaluate(&model), -1);
    }

    #[test]
    fn blocking_excludes_only_the_given_model() {
        let v = vars(2);
        let model: Model = [true, false].into_iter().collect();
        let block = Constraint::blocking(&model, &v);
        assert!(!block.is_satisfied_by(&model));
        for other in [[false, false], [true, true], [false, true]] {
            let other: Model = other.into_iter().collect();
            assert!(block.is_satisfied_by(&other));
        }
    }

    #[test]
    fn display() {
        let v = vars(3);
        let sum = LinearSum::new()
            .with_term(v[0], 1)
            .with_term(v[1], 1)
            .with_term(v[2], -2);
        assert_eq!(sum.clone().at_least(1).to_string(), "x0 + x1 - 2*x2 >= 1");
        assert_eq!(LinearSum::new().equals(0).to_string(), "0 = 0");
    }
}
