#![deny(missing_docs)]
//! Solves a 3×3 boolean grid puzzle with an external SAT/SMT solver.
//!
//! The puzzle is encoded into linear constraints over named booleans and handed
//! to a solver backend through a small typed facade.

/// The `grid` module holds the puzzle itself: rules, boards and the encoding into constraints.
pub mod grid;

/// The `smt` module is the boundary to the solver libraries, with one backend per library.
pub mod smt;
