use crate::smt::backend::{Backend, BackendStats};
use crate::smt::constraint::{BoolVar, Comparison, Constraint};
use crate::smt::error::SolveError;
use crate::smt::model::Model;
use crate::smt::result::SatResult;
use z3::ast::Bool;

/// Backend using [z3].
///
/// Linear sums go straight to z3's pseudo-boolean primitives, so no
/// encoding happens on our side.
pub struct Z3Backend<'ctx> {
    context: &'ctx z3::Context,
    solver: z3::Solver<'ctx>,
    vars: Vec<Bool<'ctx>>,
    constraints: usize,
    model: Option<Model>,
}

fn to_i32(value: i64) -> Result<i32, SolveError> {
    i32::try_from(value).map_err(|_| SolveError::WeightOverflow(value))
}

impl<'ctx> Backend<'ctx> for Z3Backend<'ctx> {
    type Init = z3::Context;

    fn default_init() -> Self::Init {
        let mut config = z3::Config::new();
        config.set_model_generation(true);
        z3::Context::new(&config)
    }

    fn new(context: &'ctx Self::Init) -> Self {
        Self {
            context,
            solver: z3::Solver::new(context),
            vars: Vec::new(),
            constraints: 0,
            model: None,
        }
    }

    fn name(&self) -> &'static str {
        "z3"
    }

    fn declare(&mut self, var: BoolVar, name: &str) {
        debug_assert_eq!(var.index(), self.vars.len());
        self.vars.push(Bool::new_const(self.context, name));
    }

    fn assert(&mut self, constraint: &Constraint) -> Result<(), SolveError> {
        let mut terms = Vec::with_capacity(constraint.sum.len());
        for &(var, weight) in constraint.sum.terms() {
            let ast = self
                .vars
                .get(var.index())
                .ok_or(SolveError::UnknownVariable(var.index()))?;
            terms.push((ast, to_i32(weight)?));
        }
        let bound = to_i32(constraint.bound)?;
        let assertion = match constraint.comparison {
            Comparison::Eq => Bool::pb_eq(self.context, &terms, bound),
            Comparison::Ge => Bool::pb_ge(self.context, &terms, bound),
            Comparison::Le => Bool::pb_le(self.context, &terms, bound),
        };
        self.solver.assert(&assertion);
        self.constraints += 1;
        self.model = None;
        Ok(())
    }

    fn check(&mut self) -> Result<SatResult, SolveError> {
        self.model = None;
        match self.solver.check() {
            z3::SatResult::Unsat => Ok(SatResult::Unsat),
            z3::SatResult::Unknown => Ok(SatResult::Unknown(
                self.solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "no reason given".to_string()),
            )),
            z3::SatResult::Sat => {
                let z3_model = self
                    .solver
                    .get_model()
                    .ok_or_else(|| SolveError::Backend("sat without a model".to_string()))?;
                let model = self
                    .vars
                    .iter()
                    .map(|var| {
                        z3_model
                            .eval(var, true)
                            .and_then(|value| value.as_bool())
                            .unwrap_or(false)
                    })
                    .collect();
                self.model = Some(model);
                Ok(SatResult::Sat)
            }
        }
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }

    fn stats(&self) -> BackendStats {
        BackendStats {
            variables: self.vars.len(),
            constraints: self.constraints,
            clauses: None,
            literals: None,
        }
    }

    fn dump(&self) -> String {
        self.solver.to_string()
    }
}
