#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Command-line parsing, dispatch and reporting.

pub(crate) mod cli;
