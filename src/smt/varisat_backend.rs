use crate::smt::backend::{Backend, BackendStats};
use crate::smt::cnf::Cnf;
use crate::smt::constraint::{BoolVar, Constraint};
use crate::smt::encode::encode_constraint;
use crate::smt::error::SolveError;
use crate::smt::model::Model;
use crate::smt::result::SatResult;
use varisat::ExtendFormula;

/// Backend using the [varisat] CDCL solver.
///
/// Linear constraints are encoded into a [`Cnf`] first; clauses reach the
/// solver lazily on the next [`Backend::check`], so a session can keep adding
/// constraints between checks.
pub struct VarisatBackend {
    solver: varisat::Solver<'static>,
    cnf: Cnf,
    names: Vec<String>,
    constraints: usize,
    loaded: usize,
    model: Option<Model>,
}

impl VarisatBackend {
    /// The encoded formula.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    fn load_pending_clauses(&mut self) {
        for clause in &self.cnf.clauses[self.loaded..] {
            let lits: Vec<varisat::Lit> = clause
                .iter()
                .map(|&lit| varisat::Lit::from_dimacs(lit as isize))
                .collect();
            self.solver.add_clause(&lits);
        }
        self.loaded = self.cnf.clauses.len();
    }
}

impl<'i> Backend<'i> for VarisatBackend {
    type Init = ();

    fn default_init() -> Self::Init {}

    fn new(_init: &'i Self::Init) -> Self {
        Self {
            solver: varisat::Solver::new(),
            cnf: Cnf::new(0),
            names: Vec::new(),
            constraints: 0,
            loaded: 0,
            model: None,
        }
    }

    fn name(&self) -> &'static str {
        "varisat"
    }

    fn declare(&mut self, var: BoolVar, name: &str) {
        debug_assert_eq!(var.index(), self.names.len());
        self.names.push(name.to_string());
        self.cnf.num_vars = self.cnf.num_vars.max(var.index() + 1);
    }

    fn assert(&mut self, constraint: &Constraint) -> Result<(), SolveError> {
        encode_constraint(&mut self.cnf, constraint)?;
        self.constraints += 1;
        self.model = None;
        Ok(())
    }

    fn check(&mut self) -> Result<SatResult, SolveError> {
        self.model = None;
        if self.cnf.has_empty_clause() {
            return Ok(SatResult::Unsat);
        }

        self.load_pending_clauses();
        let sat = self
            .solver
            .solve()
            .map_err(|e| SolveError::Backend(e.to_string()))?;
        if !sat {
            return Ok(SatResult::Unsat);
        }

        let Some(lits) = self.solver.model() else {
            return Ok(SatResult::Unknown(
                "solver reported sat without a model".to_string(),
            ));
        };
        let mut model = Model::new(self.names.len());
        for lit in lits {
            let index = lit.var().index();
            if index < self.names.len() {
                model.set(BoolVar::from_index(index), lit.is_positive());
            }
        }
        debug_assert!(self.cnf.verify(&model), "varisat model violates the encoding");
        self.model = Some(model);
        Ok(SatResult::Sat)
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }

    fn stats(&self) -> BackendStats {
        BackendStats {
            variables: self.names.len(),
            constraints: self.constraints,
            clauses: Some(self.cnf.clauses.len()),
            literals: Some(self.cnf.num_literals()),
        }
    }

    fn dump(&self) -> String {
        let header: String = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("c {} {name}\n", i + 1))
            .collect();
        format!("{header}{}", self.cnf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::constraint::LinearSum;

    fn backend_with_vars(n: usize) -> (VarisatBackend, Vec<BoolVar>) {
        let mut backend = VarisatBackend::new(&());
        let vars: Vec<BoolVar> = (0..n).map(BoolVar::from_index).collect();
        for var in &vars {
            backend.declare(*var, &format!("v{}", var.index()));
        }
        (backend, vars)
    }

    #[test]
    fn exactly_one_is_sat_with_single_true() {
        let (mut backend, vars) = backend_with_vars(3);
        backend
            .assert(&LinearSum::indicators(vars.clone()).equals(1))
            .unwrap();
        assert_eq!(backend.check().unwrap(), SatResult::Sat);
        let model = backend.model().unwrap();
        assert_eq!(vars.iter().filter(|v| model.evaluate(**v)).count(), 1);
        assert!(backend.cnf().verify(&model));
    }

    #[test]
    fn contradictory_bounds_are_unsat() {
        let (mut backend, vars) = backend_with_vars(2);
        let sum = LinearSum::indicators(vars);
        backend.assert(&sum.clone().at_least(2)).unwrap();
        backend.assert(&sum.at_most(1)).unwrap();
        assert_eq!(backend.check().unwrap(), SatResult::Unsat);
        assert!(backend.model().is_none());
    }

    #[test]
    fn impossible_bound_is_unsat_without_solving() {
        let (mut backend, vars) = backend_with_vars(2);
        backend
            .assert(&LinearSum::indicators(vars).at_least(3))
            .unwrap();
        assert_eq!(backend.check().unwrap(), SatResult::Unsat);
    }

    #[test]
    fn unconstrained_variables_appear_in_model() {
        let (mut backend, vars) = backend_with_vars(4);
        backend
            .assert(&LinearSum::indicators([vars[0]]).equals(1))
            .unwrap();
        assert!(backend.check().unwrap().is_sat());
        let model = backend.model().unwrap();
        assert_eq!(model.len(), 4);
        assert!(model.evaluate(vars[0]));
    }

    #[test]
    fn incremental_constraints_between_checks() {
        let (mut backend, vars) = backend_with_vars(2);
        backend
            .assert(&LinearSum::indicators(vars.clone()).at_least(1))
            .unwrap();
        assert!(backend.check().unwrap().is_sat());
        backend
            .assert(&LinearSum::indicators(vars.clone()).at_most(0))
            .unwrap();
        assert!(backend.check().unwrap().is_unsat());
    }

    #[test]
    fn stats_and_dump() {
        let (mut backend, vars) = backend_with_vars(3);
        backend
            .assert(&LinearSum::indicators(vars).equals(2))
            .unwrap();
        let stats = backend.stats();
        assert_eq!(stats.variables, 3);
        assert_eq!(stats.constraints, 1);
        assert_eq!(stats.clauses, Some(4));
        let dump = backend.dump();
        assert!(dump.starts_with("c 1 v0\nc 2 v1\nc 3 v2\np cnf 3 4\n"));
    }
}
