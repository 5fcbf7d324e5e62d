#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The 3×3 grid puzzle.
//!
//! Every row and every column must contain exactly two active cells, and at
//! least one of the four corners must be active. [`puzzle::GridPuzzle`]
//! turns these rules into linear constraints over nine named booleans and
//! reads the solver's model back as a [`board::Board`].

/// Concrete boards: rule checking, parsing, rendering and scrambling.
pub mod board;
/// Encoding of the puzzle into a solver session and decoding of its models.
pub mod puzzle;
/// Counting rules and the violations a board can have.
pub mod rules;

pub use board::{Board, KNOWN_SOLUTION, ParseBoardError};
pub use puzzle::{Cell, Grid, GridPuzzle, Outcome, solve_grid_puzzle};
pub use rules::{Rules, Violation};
