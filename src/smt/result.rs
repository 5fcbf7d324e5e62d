use std::fmt;

/// Answer of a satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SatResult {
    /// The asserted constraints have a model.
    Sat,
    /// The asserted constraints have no model.
    Unsat,
    /// The backend could not decide; carries its reason.
    Unknown(String),
}

impl SatResult {
    /// Returns `true` if the result is `Sat`.
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        matches!(self, Self::Sat)
    }

    /// Returns `true` if the result is `Unsat`.
    #[must_use]
    pub const fn is_unsat(&self) -> bool {
        matches!(self, Self::Unsat)
    }

    /// Returns `true` if the result is `Unknown`.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for SatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Unsat => write!(f, "unsat"),
            Self::Unknown(reason) => write!(f, "unknown ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(SatResult::Sat.is_sat());
        assert!(!SatResult::Sat.is_unsat());
        assert!(SatResult::Unsat.is_unsat());
        let unknown = SatResult::Unknown("incomplete".to_string());
        assert!(unknown.is_unknown());
        assert!(!unknown.is_sat());
    }

    #[test]
    fn display() {
        assert_eq!(SatResult::Sat.to_string(), "sat");
        assert_eq!(SatResult::Unsat.to_string(), "unsat");
        assert_eq!(
            SatResult::Unknown("canceled".to_string()).to_string(),
            "unknown (canceled)"
        );
    }
}
