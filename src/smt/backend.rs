use crate::smt::constraint::{BoolVar, Constraint};
use crate::smt::error::SolveError;
use crate::smt::model::Model;
use crate::smt::result::SatResult;
use std::fmt;

/// A solver library a [`crate::smt::session::Session`] can drive.
///
/// Implementations wrap one external solver and allow switching between them
/// without touching the puzzle encoding.
pub trait Backend<'i>: Sized {
    /// Object the constructor borrows from.
    ///
    /// z3 needs a context that outlives its solver, so it can not be created
    /// inside [`Backend::new`].
    type Init: Sized + 'i;

    /// Creates the objects required to call the constructor.
    fn default_init() -> Self::Init;

    /// Creates an empty backend.
    fn new(init: &'i Self::Init) -> Self;

    /// Short name used in logs and statistics.
    fn name(&self) -> &'static str;

    /// Registers the next boolean. `var` indexes are handed out densely from zero.
    fn declare(&mut self, var: BoolVar, name: &str);

    /// Adds a constraint over declared variables.
    ///
    /// # Errors
    ///
    /// If the constraint can not be expressed by this backend.
    fn assert(&mut self, constraint: &Constraint) -> Result<(), SolveError>;

    /// Decides the conjunction of everything asserted so far.
    ///
    /// # Errors
    ///
    /// If the underlying library fails.
    fn check(&mut self) -> Result<SatResult, SolveError>;

    /// The model found by the last `Sat` check.
    fn model(&self) -> Option<Model>;

    /// Size of the problem as the backend sees it.
    fn stats(&self) -> BackendStats;

    /// Text dump of the asserted problem in the backend's native format.
    fn dump(&self) -> String;
}

/// Problem size reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStats {
    /// Declared booleans.
    pub variables: usize,
    /// Constraints asserted through the session.
    pub constraints: usize,
    /// Clauses after encoding, for backends that encode to CNF.
    pub clauses: Option<usize>,
    /// Literal occurrences after encoding, for backends that encode to CNF.
    pub literals: Option<usize>,
}

/// Backends selectable at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Pure Rust CDCL SAT solver; linear constraints are CNF-encoded.
    #[default]
    Varisat,
    /// z3 with native pseudo-boolean constraints.
    #[cfg(feature = "z3")]
    Z3,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Varisat => write!(f, "varisat"),
            #[cfg(feature = "z3")]
            Self::Z3 => write!(f, "z3"),
        }
    }
}

/// Backend answering every check with a fixed result.
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    pub(crate) struct ScriptedBackend<'i> {
        answer: &'i SatResult,
        declared: usize,
        constraints: Vec<Constraint>,
        checks: usize,
    }

    impl<'i> Backend<'i> for ScriptedBackend<'i> {
        type Init = SatResult;

        fn default_init() -> Self::Init {
            SatResult::Sat
        }

        fn new(init: &'i Self::Init) -> Self {
            Self {
                answer: init,
                declared: 0,
                constraints: Vec::new(),
                checks: 0,
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }

        fn declare(&mut self, _var: BoolVar, _name: &str) {
            self.declared += 1;
        }

        fn assert(&mut self, constraint: &Constraint) -> Result<(), SolveError> {
            self.constraints.push(constraint.clone());
            Ok(())
        }

        fn check(&mut self) -> Result<SatResult, SolveError> {
            self.checks += 1;
            Ok(self.answer.clone())
        }

        fn model(&self) -> Option<Model> {
            self.answer.is_sat().then(|| Model::new(self.declared))
        }

        fn stats(&self) -> BackendStats {
            BackendStats {
                variables: self.declared,
                constraints: self.constraints.len(),
                clauses: None,
                literals: None,
            }
        }

        fn dump(&self) -> String {
            format!("{} checks", self.checks)
        }
    }
}
