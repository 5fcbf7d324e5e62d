use crate::smt::model::Model;
use crate::smt::constraint::BoolVar;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt;

/// A clause as DIMACS literals: positive for the variable, negative for its negation.
pub type Clause = SmallVec<[i32; 8]>;

/// A formula in conjunctive normal form over DIMACS-numbered variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// Highest variable number in use.
    pub num_vars: usize,
    /// The clauses, in insertion order.
    pub clauses: Vec<Clause>,
}

impl Cnf {
    /// Creates an empty formula over `num_vars` variables.
    #[must_use]
    pub const fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    /// Adds a clause, dropping repeated literals.
    ///
    /// Tautologies (a literal together with its negation) are skipped.
    /// Returns `true` if the clause was kept.
    pub fn add_clause(&mut self, lits: impl IntoIterator<Item = i32>) -> bool {
        let mut clause: Clause = lits.into_iter().collect();
        clause.sort_unstable_by_key(|lit| (lit.unsigned_abs(), *lit));
        clause.dedup();
        if clause.windows(2).any(|w| w[0] == -w[1]) {
            return false;
        }
        if let Some(max) = clause.iter().map(|lit| lit.unsigned_abs() as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
        true
    }

    /// Returns `true` if the formula contains the empty clause.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(SmallVec::is_empty)
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(SmallVec::len).sum()
    }

    /// Checks every clause against `model`.
    #[must_use]
    pub fn verify(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let var = BoolVar::from_index(lit.unsigned_abs() as usize - 1);
                model.evaluate(var) == (lit > 0)
            })
        })
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            if clause.is_empty() {
                writeln!(f, "0")?;
            } else {
                writeln!(f, "{} 0", clause.iter().join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clause_dedups_and_tracks_vars() {
        let mut cnf = Cnf::new(0);
        assert!(cnf.add_clause([3, -1, 3]));
        assert_eq!(cnf.clauses[0].as_slice(), &[-1, 3]);
        assert_eq!(cnf.num_vars, 3);
    }

    #[test]
    fn tautologies_are_skipped() {
        let mut cnf = Cnf::new(2);
        assert!(!cnf.add_clause([1, 2, -1]));
        assert!(cnf.clauses.is_empty());
    }

    #[test]
    fn empty_clause_is_kept() {
        let mut cnf = Cnf::new(1);
        assert!(cnf.add_clause([]));
        assert!(cnf.has_empty_clause());
        assert_eq!(cnf.to_string(), "p cnf 1 1\n0\n");
    }

    #[test]
    fn dimacs_output() {
        let mut cnf = Cnf::new(3);
        cnf.add_clause([1, -2]);
        cnf.add_clause([2, 3]);
        assert_eq!(cnf.to_string(), "p cnf 3 2\n1 -2 0\n2 3 0\n");
        assert_eq!(cnf.num_literals(), 4);
    }

    #[test]
    fn verify_against_model() {
        let mut cnf = Cnf::new(2);
        cnf.add_clause([1, 2]);
        cnf.add_clause([-1]);
        let good: Model = [false, true].into_iter().collect();
        let bad: Model = [true, true].into_iter().collect();
        assert!(cnf.verify(&good));
        assert!(!cnf.verify(&bad));
    }
}
