use std::fmt;
use std::io;

/// Errors raised while building or querying a solver session.
#[derive(Debug)]
pub enum SolveError {
    /// A boolean with this name was already declared in the session.
    DuplicateName(String),
    /// A constraint mentions a variable the session never declared.
    UnknownVariable(usize),
    /// A model was requested but the last check was not `sat`.
    NoModel,
    /// The CNF encoding of a constraint would exceed the clause limit.
    EncodingTooLarge {
        /// Number of weighted positions after normalization.
        positions: usize,
        /// Number of clauses the encoding would need.
        clauses: u128,
    },
    /// A weight or bound does not fit the backend's integer type.
    WeightOverflow(i64),
    /// The backend gave up without deciding the problem.
    Unknown(String),
    /// A model returned by the backend does not satisfy the puzzle rules.
    Unverified(String),
    /// The backend reported an internal failure.
    Backend(String),
    /// Writing the rendered output failed.
    Io(io::Error),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "Boolean `{name}` is already declared"),
            Self::UnknownVariable(index) => write!(f, "Variable #{index} was never declared"),
            Self::NoModel => write!(f, "No model available: last check was not sat"),
            Self::EncodingTooLarge { positions, clauses } => write!(
                f,
                "Encoding over {positions} positions needs {clauses} clauses, which is too many"
            ),
            Self::WeightOverflow(value) => {
                write!(f, "Value {value} does not fit the solver's integer range")
            }
            Self::Unknown(reason) => write!(f, "Solver returned unknown: {reason}"),
            Self::Unverified(detail) => write!(f, "Model failed verification: {detail}"),
            Self::Backend(msg) => write!(f, "Solver backend error: {msg}"),
            Self::Io(err) => write!(f, "Failed to write output: {err}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SolveError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl PartialEq for SolveError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateName(a), Self::DuplicateName(b))
            | (Self::Unknown(a), Self::Unknown(b))
            | (Self::Unverified(a), Self::Unverified(b))
            | (Self::Backend(a), Self::Backend(b)) => a == b,
            (Self::UnknownVariable(a), Self::UnknownVariable(b)) => a == b,
            (Self::NoModel, Self::NoModel) => true,
            (
                Self::EncodingTooLarge {
                    positions: p1,
                    clauses: c1,
                },
                Self::EncodingTooLarge {
                    positions: p2,
                    clauses: c2,
                },
            ) => p1 == p2 && c1 == c2,
            (Self::WeightOverflow(a), Self::WeightOverflow(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
