use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::solver::{self, SolutionStats, SolveError, Solver, SolverConfig};
use itertools::Itertools;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SudokuError {
    #[error("the board has no rows")]
    Empty,
    #[error("board size {0} is not a perfect square")]
    SizeNotSquare(usize),
    #[error("row {row} has {len} cells, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },
    #[error("value {value} at ({row}, {col}) is outside 0..={size}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: usize,
        size: usize,
    },
    #[error("line {line}: invalid cell '{token}'")]
    InvalidToken { line: usize, token: String },
    #[error("failed to read sudoku file: {0}")]
    Io(#[from] std::io::Error),
}

/// A square grid of numbers; `0` marks an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// An all-empty `size` x `size` board.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self(vec![vec![0; size]; size])
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<usize>> {
        self.0.iter()
    }

    /// Filled cells as `(row, col, value)`.
    pub fn givens(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(move |(col, &value)| Cell::new(row, col, value))
        })
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Board {
    fn from(board: [[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.size();
        let block = integer_sqrt(size).filter(|b| *b > 1);
        let width = size.to_string().len();

        for (r, row) in self.0.iter().enumerate() {
            if let Some(b) = block {
                if r > 0 && r % b == 0 {
                    let segment = "-".repeat(b * (width + 1) + 1);
                    let line = std::iter::repeat_n(segment, size / b).join("+");
                    writeln!(f, "{}", &line[1..line.len() - 1])?;
                }
            }

            let cells = row
                .iter()
                .enumerate()
                .map(|(c, &value)| {
                    let cell = if value == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{value:>width$}")
                    };
                    match block {
                        Some(b) if c > 0 && c % b == 0 => format!("| {cell}"),
                        _ => cell,
                    }
                })
                .join(" ");
            writeln!(f, "{cells}")?;
        }
        Ok(())
    }
}

/// The proposition "cell (`row`, `col`) holds `value`".
///
/// Rows and columns count from zero, values from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize, value: usize) -> Self {
        Self { row, col, value }
    }

    /// Positive DIMACS variable number for this cell on a board of `size`.
    #[must_use]
    pub fn encode(&self, size: usize) -> u32 {
        let index = self.row * size * size + self.col * size + (self.value - 1) + 1;
        u32::try_from(index).unwrap_or(u32::MAX)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}v{}", self.row, self.col, self.value)
    }
}

fn integer_sqrt(n: usize) -> Option<usize> {
    (0..=n).take_while(|b| b * b <= n).find(|b| b * b == n)
}

/// At least one of `cells` holds `value`, and no two of them do.
fn exactly_one(cells: &[Cell], clauses: &mut Vec<Clause<Cell>>) {
    clauses.push(cells.iter().map(|&c| Literal::new(c, true)).collect());
    for (i, &a) in cells.iter().enumerate() {
        for &b in &cells[i + 1..] {
            clauses.push(Clause::new([Literal::new(a, false), Literal::new(b, false)]));
        }
    }
}

/// A validated puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    pub board: Board,
    size: usize,
    block_size: usize,
}

impl Sudoku {
    /// Checks the board's shape and values.
    ///
    /// # Errors
    ///
    /// The board must be square with a perfect-square side and every value in
    /// `0..=size`.
    pub fn new(board: Board) -> Result<Self, SudokuError> {
        let size = board.size();
        if size == 0 {
            return Err(SudokuError::Empty);
        }
        let block_size = integer_sqrt(size).ok_or(SudokuError::SizeNotSquare(size))?;

        for (row, cells) in board.iter().enumerate() {
            if cells.len() != size {
                return Err(SudokuError::RaggedRow {
                    row,
                    len: cells.len(),
                    size,
                });
            }
            if let Some((col, &value)) = cells.iter().find_position(|&&v| v > size) {
                return Err(SudokuError::ValueOutOfRange {
                    row,
                    col,
                    value,
                    size,
                });
            }
        }

        Ok(Self {
            board,
            size,
            block_size,
        })
    }

    /// Encodes the puzzle.
    ///
    /// Clause order: one unit clause per given, then for every cell "exactly
    /// one value", then for every row, column and block and every value
    /// "exactly one cell holds it".
    #[must_use]
    pub fn to_cnf(&self) -> Cnf<Cell> {
        let n = self.size;
        let b = self.block_size;
        let values = 1..=n;
        let mut clauses: Vec<Clause<Cell>> = self
            .board
            .givens()
            .map(|cell| Clause::new([Literal::new(cell, true)]))
            .collect();

        for (row, col) in (0..n).cartesian_product(0..n) {
            let cells = values.clone().map(|v| Cell::new(row, col, v)).collect_vec();
            exactly_one(&cells, &mut clauses);
        }

        for value in values {
            for row in 0..n {
                let cells = (0..n).map(|col| Cell::new(row, col, value)).collect_vec();
                exactly_one(&cells, &mut clauses);
            }
            for col in 0..n {
                let cells = (0..n).map(|row| Cell::new(row, col, value)).collect_vec();
                exactly_one(&cells, &mut clauses);
            }
            for (br, bc) in (0..b).cartesian_product(0..b) {
                let cells = (0..b)
                    .cartesian_product(0..b)
                    .map(|(r, c)| Cell::new(br * b + r, bc * b + c, value))
                    .collect_vec();
                exactly_one(&cells, &mut clauses);
            }
        }

        Cnf::from(clauses)
    }

    /// The encoding with cells numbered for DIMACS output.
    #[must_use]
    pub fn to_dimacs_cnf(&self) -> Cnf<u32> {
        self.to_cnf().map_variables(|cell| cell.encode(self.size))
    }

    /// Reads a solved grid out of `assignment`.
    #[must_use]
    pub fn decode(&self, assignment: Option<&Assignment<Cell>>) -> Option<Board> {
        assignment_to_board(assignment, self.size)
    }

    /// Solves with the default engine; `None` when the puzzle has no solution.
    #[must_use]
    pub fn solve(&self) -> Option<Board> {
        self.decode(solver::solve(&self.to_cnf()).as_ref())
    }

    /// Solves with engine `S`, also returning its statistics.
    ///
    /// # Errors
    ///
    /// Whatever `S` reports, i.e. a depth limit set in `config` being hit.
    pub fn solve_with<S: Solver<Cell>>(
        &self,
        config: SolverConfig,
    ) -> Result<(Option<Board>, SolutionStats), SolveError> {
        let mut engine = S::with_config(self.to_cnf(), config);
        let solution = engine.solve()?;
        Ok((self.decode(solution.as_ref()), engine.stats()))
    }

    /// Whether `candidate` is a complete, valid grid agreeing with the givens.
    #[must_use]
    pub fn is_solution(&self, candidate: &Board) -> bool {
        let n = self.size;
        let b = self.block_size;
        if candidate.size() != n {
            return false;
        }
        let is_permutation = |cells: Vec<usize>| cells.into_iter().sorted().eq(1..=n);

        self.board
            .givens()
            .all(|g| candidate.get(g.row, g.col) == Some(g.value))
            && (0..n).all(|r| is_permutation((0..n).filter_map(|c| candidate.get(r, c)).collect()))
            && (0..n).all(|c| is_permutation((0..n).filter_map(|r| candidate.get(r, c)).collect()))
            && (0..b).cartesian_product(0..b).all(|(br, bc)| {
                is_permutation(
                    (0..b)
                        .cartesian_product(0..b)
                        .filter_map(|(r, c)| candidate.get(br * b + r, bc * b + c))
                        .collect(),
                )
            })
    }
}

impl TryFrom<Board> for Sudoku {
    type Error = SudokuError;

    fn try_from(board: Board) -> Result<Self, Self::Error> {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board)
    }
}

/// Builds a `size` x `size` grid from an assignment: every cell variable
/// assigned true places its value. An unsatisfiable result (`None`) yields
/// `None`, never a partial grid.
#[must_use]
pub fn assignment_to_board(assignment: Option<&Assignment<Cell>>, size: usize) -> Option<Board> {
    let assignment = assignment?;
    let mut board = Board::empty(size);
    for cell in assignment.true_variables() {
        if let Some(slot) = board.0.get_mut(cell.row).and_then(|r| r.get_mut(cell.col)) {
            *slot = cell.value;
        }
    }
    Some(board)
}

/// Solves `board`, returning the completed grid or `None` if it has no solution.
///
/// # Errors
///
/// If the board is malformed, see [`Sudoku::new`].
pub fn solve_board(board: Board) -> Result<Option<Board>, SudokuError> {
    Ok(Sudoku::new(board)?.solve())
}

/// Parses a puzzle from text.
///
/// One row per non-empty line. Cells are separated by whitespace; a row
/// written without any whitespace is read one character per cell. `0`, `.`
/// and `_` mark empty cells. Lines starting with `#` are comments.
///
/// # Errors
///
/// `SudokuError::InvalidToken` for an unreadable cell, or any shape error
/// from [`Sudoku::new`].
pub fn parse_sudoku(input: &str) -> Result<Sudoku, SudokuError> {
    let parse_cell = |line: usize, token: &str| match token {
        "." | "_" => Ok(0),
        _ => token.parse::<usize>().map_err(|_| SudokuError::InvalidToken {
            line,
            token: token.to_string(),
        }),
    };

    let mut rows = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = if line.contains(char::is_whitespace) {
            line.split_whitespace()
                .map(|token| parse_cell(index + 1, token))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            line.chars()
                .map(|ch| parse_cell(index + 1, ch.encode_utf8(&mut [0; 4])))
                .collect::<Result<Vec<_>, _>>()?
        };
        rows.push(row);
    }

    Sudoku::new(Board::new(rows))
}

/// Reads and parses a puzzle file, see [`parse_sudoku`].
///
/// # Errors
///
/// I/O failures, and everything [`parse_sudoku`] rejects.
pub fn parse_sudoku_file(path: impl AsRef<Path>) -> Result<Sudoku, SudokuError> {
    let contents = std::fs::read_to_string(path)?;
    parse_sudoku(&contents)
}

pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[0, 0, 0, 2], [0, 0, 0, 1], [4, 0, 0, 0], [2, 0, 0, 0]];

pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_sqrt() {
        assert_eq!(integer_sqrt(1), Some(1));
        assert_eq!(integer_sqrt(4), Some(2));
        assert_eq!(integer_sqrt(16), Some(4));
        assert_eq!(integer_sqrt(6), None);
    }

    #[test]
    fn test_cell_encode_is_dense() {
        let size = 4;
        let codes = (0..size)
            .cartesian_product(0..size)
            .cartesian_product(1..=size)
            .map(|((r, c), v)| Cell::new(r, c, v).encode(size))
            .sorted()
            .collect_vec();
        assert_eq!(codes, (1..=64).collect_vec());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(Sudoku::new(Board::default()), Err(SudokuError::Empty)));
        assert!(matches!(
            Sudoku::new(Board::empty(3)),
            Err(SudokuError::SizeNotSquare(3))
        ));
        assert!(matches!(
            Sudoku::new(Board::new(vec![vec![0; 4], vec![0; 4], vec![0; 3], vec![0; 4]])),
            Err(SudokuError::RaggedRow { row: 2, len: 3, size: 4 })
        ));
        assert!(matches!(
            Sudoku::new(Board::new(vec![vec![0, 0, 0, 5], vec![0; 4], vec![0; 4], vec![0; 4]])),
            Err(SudokuError::ValueOutOfRange { row: 0, col: 3, value: 5, size: 4 })
        ));
    }

    #[test]
    fn test_clause_counts() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_FOUR)).expect("valid");
        let cnf = sudoku.to_cnf();
        // 4 givens, then 4 groups of 16 "exactly one" constraints of 1 + 6 clauses.
        assert_eq!(cnf.len(), 4 + 4 * 16 * 7);
        assert!(cnf.iter().take(4).all(Clause::is_unit));
        assert_eq!(cnf.variables().len(), 64);
    }

    #[test]
    fn test_decode_none_is_none() {
        let sudoku = Sudoku::new(Board::empty(4)).expect("valid");
        assert_eq!(sudoku.decode(None), None);
    }

    #[test]
    fn test_decode_places_true_cells() {
        let assignment: Assignment<Cell> = [
            (Cell::new(0, 0, 1), true),
            (Cell::new(0, 0, 2), false),
            (Cell::new(1, 0, 1), false),
            (Cell::new(3, 2, 4), true),
        ]
        .into_iter()
        .collect();
        let board = assignment_to_board(Some(&assignment), 4).expect("some");
        assert_eq!(board.get(0, 0), Some(1));
        assert_eq!(board.get(1, 0), Some(0));
        assert_eq!(board.get(3, 2), Some(4));
    }

    #[test]
    fn test_parse_sudoku() {
        let spaced =
            parse_sudoku("# a puzzle\n0 0 0 2\n. 0 0 1\n\n4 _ 0 0\n2 0 0 0\n").expect("valid");
        let compact = parse_sudoku("0002\n0001\n4000\n2000\n").expect("valid");
        assert_eq!(spaced.board, Board::from(EXAMPLE_FOUR));
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_parse_sudoku_invalid_token() {
        assert!(matches!(
            parse_sudoku("0 0 0 2\n0 x 0 1\n"),
            Err(SudokuError::InvalidToken { line: 2, .. })
        ));
    }

    #[test]
    fn test_display() {
        let rendered = Board::from(EXAMPLE_FOUR).to_string();
        assert_eq!(
            rendered,
            ". . | . 2\n. . | . 1\n----+----\n4 . | . .\n2 . | . .\n"
        );
    }

    #[test]
    fn test_is_solution() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_FOUR)).expect("valid");
        let good = Board::from([[1, 4, 3, 2], [3, 2, 4, 1], [4, 1, 2, 3], [2, 3, 1, 4]]);
        assert!(sudoku.is_solution(&good));

        let wrong_given = Board::from([[1, 4, 2, 3], [3, 2, 4, 1], [4, 1, 3, 2], [2, 3, 1, 4]]);
        assert!(!sudoku.is_solution(&wrong_given));
    }
}
