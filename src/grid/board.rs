use crate::grid::rules::{Rules, Violation};
use itertools::Itertools;
use std::fmt::Display;
use std::str::FromStr;

/// Width and height of the grid.
pub const SIZE: usize = 3;

/// The four corner cells as `(row, column)`.
pub const CORNERS: [(usize, usize); 4] = [(0, 0), (0, SIZE - 1), (SIZE - 1, 0), (SIZE - 1, SIZE - 1)];

/// A board satisfying the default rules, kept as a reference answer.
pub const KNOWN_SOLUTION: Board = Board([
    [true, true, false],
    [false, true, true],
    [true, false, true],
]);

/// A concrete on/off assignment of the 3×3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board([[bool; SIZE]; SIZE]);

impl Board {
    /// Creates a board from its rows.
    #[must_use]
    pub const fn new(cells: [[bool; SIZE]; SIZE]) -> Self {
        Self(cells)
    }

    /// A random board where each cell is active with probability `density`.
    #[must_use]
    pub fn scrambled(rng: &mut fastrand::Rng, density: f64) -> Self {
        let mut cells = [[false; SIZE]; SIZE];
        for cell in cells.iter_mut().flatten() {
            *cell = rng.f64() < density;
        }
        Self(cells)
    }

    /// Value of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not below [`SIZE`].
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> bool {
        self.0[row][col]
    }

    /// Active cells in `row`.
    #[must_use]
    pub fn row_sum(&self, row: usize) -> u32 {
        count(self.0[row].iter().copied())
    }

    /// Active cells in `col`.
    #[must_use]
    pub fn column_sum(&self, col: usize) -> u32 {
        count(self.0.iter().map(|row| row[col]))
    }

    /// Active corner cells.
    #[must_use]
    pub fn corner_sum(&self) -> u32 {
        count(CORNERS.iter().map(|&(row, col)| self.0[row][col]))
    }

    /// Every rule this board breaks, rows first, then columns, then corners.
    #[must_use]
    pub fn violations(&self, rules: &Rules) -> Vec<Violation> {
        let rows = (0..SIZE).filter_map(|row| {
            let actual = self.row_sum(row);
            (actual != rules.row_target).then_some(Violation::Row {
                row,
                actual,
                expected: rules.row_target,
            })
        });
        let columns = (0..SIZE).filter_map(|column| {
            let actual = self.column_sum(column);
            (actual != rules.column_target).then_some(Violation::Column {
                column,
                actual,
                expected: rules.column_target,
            })
        });
        let corners = self.corner_sum();
        let corner = (corners < rules.min_corners).then_some(Violation::Corners {
            actual: corners,
            minimum: rules.min_corners,
        });
        rows.chain(columns).chain(corner).collect()
    }

    /// Returns whether the board meets every rule.
    #[must_use]
    pub fn satisfies(&self, rules: &Rules) -> bool {
        self.violations(rules).is_empty()
    }

    /// Fraction of cells that match `other`, from `0.0` to `1.0`.
    #[must_use]
    pub fn agreement(&self, other: &Self) -> f64 {
        let same = self
            .0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .filter(|(a, b)| a == b)
            .count();
        #[allow(clippy::cast_precision_loss)]
        let ratio = same as f64 / (SIZE * SIZE) as f64;
        ratio
    }
}

fn count(cells: impl Iterator<Item = bool>) -> u32 {
    cells.map(u32::from).sum()
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .0
            .iter()
            .map(|row| row.iter().map(|&on| if on { '1' } else { '0' }).join(" "))
            .join("\n");
        write!(f, "{text}")
    }
}

/// Reasons a board description fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    /// The description does not have exactly [`SIZE`] rows.
    RowCount(usize),
    /// A row does not have exactly [`SIZE`] cells.
    RowLength {
        /// Zero-based row index.
        row: usize,
        /// Cells found in that row.
        len: usize,
    },
    /// A character other than `1`, `0`, `#` or `.`.
    InvalidCell(char),
}

impl Display for ParseBoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowCount(n) => write!(f, "expected {SIZE} rows, found {n}"),
            Self::RowLength { row, len } => {
                write!(f, "row {row} has {len} cells, expected {SIZE}")
            }
            Self::InvalidCell(c) => write!(f, "invalid cell `{c}`, use 1/0 or #/."),
        }
    }
}

impl std::error::Error for ParseBoardError {}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses rows separated by `,`, `/`, `;` or newlines, e.g. `110,011,101`.
    /// Whitespace inside a row is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split([',', '/', ';', '\n'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != SIZE {
            return Err(ParseBoardError::RowCount(rows.len()));
        }

        let mut cells = [[false; SIZE]; SIZE];
        for (r, row) in rows.iter().enumerate() {
            let values: Vec<bool> = row
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '1' | '#' => Ok(true),
                    '0' | '.' => Ok(false),
                    other => Err(ParseBoardError::InvalidCell(other)),
                })
                .collect::<Result<_, _>>()?;
            if values.len() != SIZE {
                return Err(ParseBoardError::RowLength {
                    row: r,
                    len: values.len(),
                });
            }
            cells[r].copy_from_slice(&values);
        }
        Ok(Self(cells))
    }
}
