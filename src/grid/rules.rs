use std::fmt;

/// Counting rules every solved board must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rules {
    /// Active cells required in every row.
    pub row_target: u32,
    /// Active cells required in every column.
    pub column_target: u32,
    /// Minimum number of active corner cells.
    pub min_corners: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            row_target: 2,
            column_target: 2,
            min_corners: 1,
        }
    }
}

/// A rule a board breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// Row `row` has `actual` active cells instead of `expected`.
    Row {
        /// Zero-based row index.
        row: usize,
        /// Active cells found.
        actual: u32,
        /// Active cells required.
        expected: u32,
    },
    /// Column `column` has `actual` active cells instead of `expected`.
    Column {
        /// Zero-based column index.
        column: usize,
        /// Active cells found.
        actual: u32,
        /// Active cells required.
        expected: u32,
    },
    /// Only `actual` corners are active, fewer than `minimum`.
    Corners {
        /// Active corners found.
        actual: u32,
        /// Active corners required.
        minimum: u32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row {
                row,
                actual,
                expected,
            } => write!(f, "row {row} has {actual} active cells, expected {expected}"),
            Self::Column {
                column,
                actual,
                expected,
            } => write!(
                f,
                "column {column} has {actual} active cells, expected {expected}"
            ),
            Self::Corners { actual, minimum } => {
                write!(f, "{actual} corners active, need at least {minimum}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let rules = Rules::default();
        assert_eq!(rules.row_target, 2);
        assert_eq!(rules.column_target, 2);
        assert_eq!(rules.min_corners, 1);
    }

    #[test]
    fn violation_messages() {
        let row = Violation::Row {
            row: 1,
            actual: 3,
            expected: 2,
        };
        assert_eq!(row.to_string(), "row 1 has 3 active cells, expected 2");
        let corners = Violation::Corners {
            actual: 0,
            minimum: 1,
        };
        assert_eq!(corners.to_string(), "0 corners active, need at least 1");
    }
}
