use crate::smt::backend::{Backend, BackendStats};
use crate::smt::constraint::{BoolVar, Constraint};
use crate::smt::error::SolveError;
use crate::smt::model::Model;
use crate::smt::result::SatResult;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Mutable solver state: declared booleans, asserted constraints and the
/// outcome of the last check.
pub struct Session<B> {
    backend: B,
    names: Vec<String>,
    lookup: FxHashMap<String, BoolVar>,
    constraints: Vec<Constraint>,
    last: Option<SatResult>,
    solve_time: Duration,
}

impl<'i, B: Backend<'i>> Session<B> {
    /// Creates an empty session over a fresh backend.
    pub fn new(init: &'i B::Init) -> Self {
        let backend = B::new(init);
        tracing::debug!("Created {} session", backend.name());
        Self {
            backend,
            names: Vec::new(),
            lookup: FxHashMap::default(),
            constraints: Vec::new(),
            last: None,
            solve_time: Duration::ZERO,
        }
    }

    /// Declares a named boolean.
    ///
    /// # Errors
    ///
    /// [`SolveError::DuplicateName`] if the name is taken.
    pub fn declare_boolean(&mut self, name: impl Into<String>) -> Result<BoolVar, SolveError> {
        let name = name.into();
        if self.lookup.contains_key(&name) {
            return Err(SolveError::DuplicateName(name));
        }
        let var = BoolVar::from_index(self.names.len());
        self.backend.declare(var, &name);
        self.lookup.insert(name.clone(), var);
        self.names.push(name);
        Ok(var)
    }

    /// Adds a constraint.
    ///
    /// # Errors
    ///
    /// [`SolveError::UnknownVariable`] if the constraint mentions an
    /// undeclared variable, or any error the backend raises while encoding.
    pub fn add(&mut self, constraint: Constraint) -> Result<(), SolveError> {
        if let Some(var) = constraint.vars().find(|var| var.index() >= self.names.len()) {
            return Err(SolveError::UnknownVariable(var.index()));
        }
        tracing::debug!("Asserting {}", self.describe(&constraint));
        self.backend.assert(&constraint)?;
        self.constraints.push(constraint);
        self.last = None;
        Ok(())
    }

    /// Decides the asserted constraints.
    ///
    /// # Errors
    ///
    /// If the backend fails. An undecided problem is `Ok(SatResult::Unknown)`.
    pub fn check(&mut self) -> Result<SatResult, SolveError> {
        let start = Instant::now();
        let result = self.backend.check()?;
        let elapsed = start.elapsed();
        self.solve_time += elapsed;
        tracing::debug!(
            "{}: {result} in {elapsed:?} ({} vars, {} constraints)",
            self.backend.name(),
            self.names.len(),
            self.constraints.len()
        );
        self.last = Some(result.clone());
        Ok(result)
    }

    /// The model of the last check.
    ///
    /// # Errors
    ///
    /// [`SolveError::NoModel`] unless the last check returned `Sat` and no
    /// constraint was added since.
    pub fn model(&self) -> Result<Model, SolveError> {
        match self.last {
            Some(SatResult::Sat) => self.backend.model().ok_or(SolveError::NoModel),
            _ => Err(SolveError::NoModel),
        }
    }

    /// Looks up a declared boolean by name.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<BoolVar> {
        self.lookup.get(name).copied()
    }

    /// Name `var` was declared with.
    #[must_use]
    pub fn name_of(&self, var: BoolVar) -> Option<&str> {
        self.names.get(var.index()).map(String::as_str)
    }

    /// Declared booleans in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = BoolVar> {
        (0..self.names.len()).map(BoolVar::from_index)
    }

    /// Constraints asserted so far.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Backend problem size.
    #[must_use]
    pub fn stats(&self) -> BackendStats {
        self.backend.stats()
    }

    /// Accumulated time spent in [`Session::check`].
    #[must_use]
    pub const fn solve_time(&self) -> Duration {
        self.solve_time
    }

    /// Text dump of the problem in the backend's native format.
    #[must_use]
    pub fn dump(&self) -> String {
        self.backend.dump()
    }

    /// Name of the backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Renders a constraint with declared names in place of variable handles.
    #[must_use]
    pub fn describe(&self, constraint: &Constraint) -> String {
        let terms: Vec<String> = constraint
            .sum
            .terms()
            .iter()
            .map(|&(var, weight)| {
                let name = self.name_of(var).unwrap_or("?");
                if weight == 1 {
                    name.to_string()
                } else {
                    format!("{weight}*{name}")
                }
            })
            .collect();
        let lhs = if terms.is_empty() {
            "0".to_string()
        } else {
            terms.join(" + ")
        };
        format!("{lhs} {} {}", constraint.comparison, constraint.bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::backend::scripted::ScriptedBackend;
    use crate::smt::constraint::LinearSum;
    use crate::smt::varisat_backend::VarisatBackend;

    #[test]
    fn declare_rejects_duplicates() {
        let mut session: Session<VarisatBackend> = Session::new(&());
        let a = session.declare_boolean("a").unwrap();
        assert_eq!(session.var("a"), Some(a));
        assert_eq!(session.name_of(a), Some("a"));
        assert_eq!(
            session.declare_boolean("a"),
            Err(SolveError::DuplicateName("a".to_string()))
        );
        assert_eq!(session.vars().count(), 1);
    }

    #[test]
    fn add_rejects_undeclared_variables() {
        let mut session: Session<VarisatBackend> = Session::new(&());
        session.declare_boolean("a").unwrap();
        let stray = BoolVar::from_index(5);
        let result = session.add(LinearSum::indicators([stray]).at_least(1));
        assert_eq!(result, Err(SolveError::UnknownVariable(5)));
        assert!(session.constraints().is_empty());
    }

    #[test]
    fn model_requires_sat_check() {
        let mut session: Session<VarisatBackend> = Session::new(&());
        let a = session.declare_boolean("a").unwrap();
        assert_eq!(session.model(), Err(SolveError::NoModel));

        session.add(LinearSum::indicators([a]).equals(1)).unwrap();
        assert_eq!(session.check().unwrap(), SatResult::Sat);
        assert!(session.model().unwrap().evaluate(a));

        session.add(LinearSum::indicators([a]).equals(0)).unwrap();
        assert_eq!(session.model(), Err(SolveError::NoModel));
        assert_eq!(session.check().unwrap(), SatResult::Unsat);
        assert_eq!(session.model(), Err(SolveError::NoModel));
    }

    #[test]
    fn unknown_has_no_model() {
        let answer = SatResult::Unknown("gave up".to_string());
        let mut session: Session<ScriptedBackend> = Session::new(&answer);
        session.declare_boolean("a").unwrap();
        assert!(session.check().unwrap().is_unknown());
        assert_eq!(session.model(), Err(SolveError::NoModel));
    }

    #[test]
    fn describe_uses_names() {
        let mut session: Session<VarisatBackend> = Session::new(&());
        let a = session.declare_boolean("cell_0_0").unwrap();
        let b = session.declare_boolean("cell_0_1").unwrap();
        let constraint = LinearSum::new().with_term(a, 1).with_term(b, 2).at_most(2);
        assert_eq!(session.describe(&constraint), "cell_0_0 + 2*cell_0_1 <= 2");
        assert_eq!(session.backend_name(), "varisat");
    }
}
