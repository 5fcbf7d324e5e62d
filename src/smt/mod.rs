#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Typed boundary to the external solver libraries.
//!
//! A [`Session`] collects named booleans and linear [`Constraint`]s and hands
//! them to a [`Backend`]. The default backend is varisat, a pure Rust SAT
//! solver, with constraints CNF-encoded by [`encode`]. Enabling the `z3`
//! feature adds a backend that passes the sums to z3's native
//! pseudo-boolean constraints.

/// The `Backend` trait every solver library is wrapped in.
pub mod backend;
/// Clause storage and DIMACS output.
pub mod cnf;
pub mod constraint;
pub mod encode;
/// Errors raised by sessions and backends.
pub mod error;
/// Satisfying assignments.
pub mod model;
/// Answers of a satisfiability check.
pub mod result;
/// Named booleans and constraints on top of a backend.
pub mod session;
/// Backend driving the varisat SAT solver.
pub mod varisat_backend;
/// Backend driving z3 through its pseudo-boolean constraints.
#[cfg(feature = "z3")]
pub mod z3_backend;

pub use backend::{Backend, BackendKind, BackendStats};
pub use constraint::{BoolVar, Comparison, Constraint, LinearSum};
pub use error::SolveError;
pub use model::Model;
pub use result::SatResult;
pub use session::Session;
pub use varisat_backend::VarisatBackend;
#[cfg(feature = "z3")]
pub use z3_backend::Z3Backend;
