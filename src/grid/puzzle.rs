use crate::grid::board::{Board, CORNERS, SIZE};
use crate::grid::rules::Rules;
use crate::smt::{
    Backend, BoolVar, Constraint, LinearSum, Model, SatResult, Session, SolveError,
    VarisatBackend,
};
use itertools::Itertools;
use std::io::Write;

/// One grid position and the boolean deciding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
    /// Solver variable for this cell.
    pub var: BoolVar,
}

/// The nine cell variables of a session, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[BoolVar; SIZE]; SIZE],
}

impl Grid {
    /// Declares `cell_{row}_{col}` for every position.
    ///
    /// # Errors
    ///
    /// [`SolveError::DuplicateName`] if the session already has cell names.
    pub fn declare<'i, B: Backend<'i>>(session: &mut Session<B>) -> Result<Self, SolveError> {
        let mut cells = [[BoolVar::from_index(0); SIZE]; SIZE];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, var) in line.iter_mut().enumerate() {
                *var = session.declare_boolean(format!("cell_{row}_{col}"))?;
            }
        }
        Ok(Self { cells })
    }

    /// The cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not below [`SIZE`].
    #[must_use]
    pub const fn cell(&self, row: usize, col: usize) -> Cell {
        Cell {
            row,
            col,
            var: self.cells[row][col],
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..SIZE)
            .cartesian_product(0..SIZE)
            .map(|(row, col)| self.cell(row, col))
    }

    /// Variables of row `row`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = BoolVar> + '_ {
        self.cells[row].iter().copied()
    }

    /// Variables of column `col`.
    pub fn column(&self, col: usize) -> impl Iterator<Item = BoolVar> + '_ {
        self.cells.iter().map(move |line| line[col])
    }

    /// Variables of the four corners.
    pub fn corners(&self) -> impl Iterator<Item = BoolVar> + '_ {
        CORNERS.iter().map(|&(row, col)| self.cells[row][col])
    }

    /// Every cell variable.
    #[must_use]
    pub fn vars(&self) -> Vec<BoolVar> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Reads the board a model describes.
    #[must_use]
    pub fn decode(&self, model: &Model) -> Board {
        let mut cells = [[false; SIZE]; SIZE];
        for cell in self.cells() {
            cells[cell.row][cell.col] = model.evaluate(cell.var);
        }
        Board::new(cells)
    }
}

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The solver found this board.
    Solved(Board),
    /// The rules can not be met.
    NoSolution,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Solved`].
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// The solved board, if any.
    #[must_use]
    pub const fn board(&self) -> Option<&Board> {
        match self {
            Self::Solved(board) => Some(board),
            Self::NoSolution => None,
        }
    }

    /// Writes `Solution found:` and the board, or `No solution found`.
    ///
    /// # Errors
    ///
    /// If writing to `out` fails.
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Self::Solved(board) => writeln!(out, "Solution found:\n{board}"),
            Self::NoSolution => writeln!(out, "No solution found"),
        }
    }
}

/// The 3×3 puzzle: rules plus the encoding into solver constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPuzzle {
    rules: Rules,
    verify: bool,
}

impl Default for GridPuzzle {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl GridPuzzle {
    /// Puzzle over `rules`; models are verified by default.
    #[must_use]
    pub const fn new(rules: Rules) -> Self {
        Self {
            rules,
            verify: true,
        }
    }

    /// Enables or disables checking decoded boards against the rules.
    #[must_use]
    pub const fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// The rules in force.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// One equality per row and column plus the corner lower bound.
    #[must_use]
    pub fn constraints(&self, grid: &Grid) -> Vec<Constraint> {
        let rows = (0..SIZE)
            .map(|row| LinearSum::indicators(grid.row(row)).equals(i64::from(self.rules.row_target)));
        let columns = (0..SIZE).map(|col| {
            LinearSum::indicators(grid.column(col)).equals(i64::from(self.rules.column_target))
        });
        let corners =
            LinearSum::indicators(grid.corners()).at_least(i64::from(self.rules.min_corners));
        rows.chain(columns).chain(std::iter::once(corners)).collect()
    }

    /// Declares the grid in `session` and asserts the puzzle constraints.
    ///
    /// # Errors
    ///
    /// If declaring or encoding fails.
    pub fn encode<'i, B: Backend<'i>>(
        &self,
        session: &mut Session<B>,
    ) -> Result<Grid, SolveError> {
        let grid = Grid::declare(session)?;
        for constraint in self.constraints(&grid) {
            session.add(constraint)?;
        }
        Ok(grid)
    }

    /// Runs one check on an encoded session and decodes the model.
    ///
    /// # Errors
    ///
    /// [`SolveError::Unknown`] if the backend can not decide,
    /// [`SolveError::Unverified`] if the decoded board breaks a rule.
    pub fn check<'i, B: Backend<'i>>(
        &self,
        session: &mut Session<B>,
        grid: &Grid,
    ) -> Result<Outcome, SolveError> {
        match session.check()? {
            SatResult::Sat => {
                let model = session.model()?;
                let board = grid.decode(&model);
                if self.verify {
                    self.verify_model(session, &model, &board)?;
                }
                Ok(Outcome::Solved(board))
            }
            SatResult::Unsat => Ok(Outcome::NoSolution),
            SatResult::Unknown(reason) => Err(SolveError::Unknown(reason)),
        }
    }

    fn verify_model<'i, B: Backend<'i>>(
        &self,
        session: &Session<B>,
        model: &Model,
        board: &Board,
    ) -> Result<(), SolveError> {
        if let Some(broken) = session
            .constraints()
            .iter()
            .find(|constraint| !constraint.is_satisfied_by(model))
        {
            return Err(SolveError::Unverified(format!(
                "violates {}",
                session.describe(broken)
            )));
        }
        let violations = board.violations(&self.rules);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SolveError::Unverified(violations.iter().join("; ")))
        }
    }

    /// Enumerates distinct solutions on an encoded session, blocking each
    /// one before the next check. Stops after `limit` boards when given.
    ///
    /// # Errors
    ///
    /// As [`GridPuzzle::check`].
    pub fn enumerate<'i, B: Backend<'i>>(
        &self,
        session: &mut Session<B>,
        grid: &Grid,
        limit: Option<usize>,
    ) -> Result<Vec<Board>, SolveError> {
        let vars = grid.vars();
        let mut boards = Vec::new();
        while limit.is_none_or(|limit| boards.len() < limit) {
            match self.check(session, grid)? {
                Outcome::Solved(board) => {
                    boards.push(board);
                    let model = session.model()?;
                    session.add(Constraint::blocking(&model, &vars))?;
                }
                Outcome::NoSolution => break,
            }
        }
        tracing::debug!("Enumerated {} solutions", boards.len());
        Ok(boards)
    }

    /// Builds a fresh session and checks it once.
    ///
    /// # Errors
    ///
    /// As [`GridPuzzle::check`].
    pub fn solve<'i, B: Backend<'i>>(&self, init: &'i B::Init) -> Result<Outcome, SolveError> {
        let mut session = Session::<B>::new(init);
        let grid = self.encode(&mut session)?;
        self.check(&mut session, &grid)
    }

    /// Builds a fresh session and enumerates its solutions.
    ///
    /// # Errors
    ///
    /// As [`GridPuzzle::check`].
    pub fn solve_all<'i, B: Backend<'i>>(
        &self,
        init: &'i B::Init,
        limit: Option<usize>,
    ) -> Result<Vec<Board>, SolveError> {
        let mut session = Session::<B>::new(init);
        let grid = self.encode(&mut session)?;
        self.enumerate(&mut session, &grid, limit)
    }
}

/// Solves the puzzle with default rules and prints the result to stdout.
///
/// Returns `true` when a solution was found and printed.
///
/// # Errors
///
/// [`SolveError::Unknown`] if the solver can not decide; nothing is printed
/// in that case.
pub fn solve_grid_puzzle() -> Result<bool, SolveError> {
    let outcome = GridPuzzle::default().solve::<VarisatBackend>(&())?;
    outcome.render(&mut std::io::stdout().lock())?;
    Ok(outcome.is_solved())
}
