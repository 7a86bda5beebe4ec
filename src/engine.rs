use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the square grid.
pub const SIZE: usize = 4;

/// Value of every tile placed by [`Grid::with_random_tile`].
pub const SPAWN_TILE: Tile = 2;

/// Magnitude stored in a grid cell; `0` is an empty cell.
pub type Tile = u32;
/// Points earned by merges.
pub type Score = u64;

type Line = [Tile; SIZE];

/// A direction to slide/merge tiles.
///
/// Ordinals are fixed: Up=0, Down=1, Left=2, Right=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in enumeration order. Search policies break ties by this order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    #[inline]
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction '{0}' (expected up, down, left, right or 0-3)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" | "0" => Ok(Direction::Up),
            "down" | "d" | "s" | "1" => Ok(Direction::Down),
            "left" | "l" | "a" | "2" => Ok(Direction::Left),
            "right" | "r" | "3" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Contract violations when building or spawning into a grid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must be 4x4, got {rows} rows with {cols} columns")]
    WrongDimensions { rows: usize, cols: usize },
    #[error("negative tile {value} at ({row}, {col})")]
    NegativeTile { row: usize, col: usize, value: i64 },
    #[error("tile {value} at ({row}, {col}) does not fit in a cell")]
    TileOutOfRange { row: usize, col: usize, value: i64 },
    #[error("no empty cell to spawn a tile into")]
    NoEmptyCell,
}

/// Result of sliding a grid in one direction, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub grid: Grid,
    /// False for an illegal move; `grid` is then the input and `score_delta` is 0.
    pub changed: bool,
    pub score_delta: Score,
}

/// Derived terminal classification of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Lost,
}

/// A 4x4 board of tile magnitudes, row-major. A plain value type: copies never alias.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid([[Tile; SIZE]; SIZE]);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    #[inline]
    pub const fn new(cells: [[Tile; SIZE]; SIZE]) -> Self { Grid(cells) }

    /// Empty grid seeded with two spawned tiles, as at the start of a game.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let g = Grid::new_game(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// assert_eq!(g.tile_sum(), 4);
    /// ```
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut grid = Grid::EMPTY;
        for _ in 0..2 {
            grid = grid.spawn_unchecked(rng);
        }
        grid
    }

    #[inline]
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] { &self.0 }

    #[inline]
    pub fn into_rows(self) -> [[Tile; SIZE]; SIZE] { self.0 }

    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Tile { self.0[row][col] }

    /// Slide and merge every line toward the edge named by `dir`.
    ///
    /// Defined for every grid: equal tiles whose sum would exceed `Tile::MAX`
    /// slide but do not merge.
    ///
    /// ```
    /// use slide_2048::engine::{Direction, Grid};
    /// let g = Grid::new([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let out = g.apply(Direction::Left);
    /// assert!(out.changed);
    /// assert_eq!(out.score_delta, 4);
    /// assert_eq!(out.grid.rows()[0], [4, 0, 0, 0]);
    /// ```
    pub fn apply(self, dir: Direction) -> MoveOutcome {
        let mut next = Grid::EMPTY;
        let mut score_delta = 0;
        for line_idx in 0..SIZE {
            let (line, score) = slide_line(self.extract_line(dir, line_idx));
            next.insert_line(dir, line_idx, line);
            score_delta += score;
        }
        if next == self {
            MoveOutcome { grid: self, changed: false, score_delta: 0 }
        } else {
            MoveOutcome { grid: next, changed: true, score_delta }
        }
    }

    /// Return the grid resulting from sliding/merging in `dir` (no random insert).
    #[inline]
    pub fn shift(self, dir: Direction) -> Self { self.apply(dir).grid }

    /// Place a 2 in a uniformly chosen empty cell, using the provided RNG.
    ///
    /// Fails with [`GridError::NoEmptyCell`] on a full grid. A grid produced by a
    /// changed move always has at least one empty cell.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng).unwrap();
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Self, GridError> {
        if self.count_empty() == 0 {
            return Err(GridError::NoEmptyCell);
        }
        Ok(self.spawn_unchecked(rng))
    }

    fn spawn_unchecked<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let target = rng.gen_range(0..self.count_empty());
        if let Some(cell) = self.0.iter_mut().flatten().filter(|t| **t == 0).nth(target) {
            *cell = SPAWN_TILE;
        }
        self
    }

    /// Lost iff no direction changes the grid.
    pub fn status(self) -> GameStatus {
        if Direction::ALL.iter().any(|&dir| self.apply(dir).changed) {
            GameStatus::Ongoing
        } else {
            GameStatus::Lost
        }
    }

    /// Return true if no legal moves remain.
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// // Nothing can slide on an empty grid.
    /// assert!(Grid::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool { self.status() == GameStatus::Lost }

    /// Directions that change the grid, in enumeration order.
    pub fn legal_moves(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&dir| self.apply(dir).changed)
    }

    pub fn count_empty(&self) -> usize {
        self.0.iter().flatten().filter(|&&t| t == 0).count()
    }

    pub fn highest_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values. Merges preserve it; only spawns raise it.
    pub fn tile_sum(&self) -> u64 {
        self.0.iter().flatten().map(|&t| t as u64).sum()
    }

    /// Read line `line_idx` ordered from the target edge of `dir` outward.
    fn extract_line(&self, dir: Direction, line_idx: usize) -> Line {
        let mut line = [0; SIZE];
        for (pos, slot) in line.iter_mut().enumerate() {
            let (row, col) = line_cell(dir, line_idx, pos);
            *slot = self.0[row][col];
        }
        line
    }

    fn insert_line(&mut self, dir: Direction, line_idx: usize, line: Line) {
        for (pos, &tile) in line.iter().enumerate() {
            let (row, col) = line_cell(dir, line_idx, pos);
            self.0[row][col] = tile;
        }
    }
}

/// Grid coordinates of the `pos`-th cell of line `line_idx`, counted from the target edge.
#[inline]
fn line_cell(dir: Direction, line_idx: usize, pos: usize) -> (usize, usize) {
    match dir {
        Direction::Left => (line_idx, pos),
        Direction::Right => (line_idx, SIZE - 1 - pos),
        Direction::Up => (pos, line_idx),
        Direction::Down => (SIZE - 1 - pos, line_idx),
    }
}

/// Compact toward index 0, merge equal neighbours once each, re-compact.
///
/// A pair whose sum does not fit in a [`Tile`] stays unmerged.
fn slide_line(line: Line) -> (Line, Score) {
    let mut out = [0; SIZE];
    let mut len = 0;
    let mut score = 0;
    let mut pending: Option<Tile> = None;
    for &tile in line.iter().filter(|&&t| t != 0) {
        let merged = pending.filter(|&prev| prev == tile).and_then(|prev| prev.checked_add(tile));
        match (pending, merged) {
            (_, Some(merged)) => {
                out[len] = merged;
                len += 1;
                score += merged as Score;
                pending = None;
            }
            (Some(prev), None) => {
                out[len] = prev;
                len += 1;
                pending = Some(tile);
            }
            (None, None) => pending = Some(tile),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }
    (out, score)
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|&t| format_val(t)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}

impl From<[[Tile; SIZE]; SIZE]> for Grid {
    fn from(cells: [[Tile; SIZE]; SIZE]) -> Self { Grid(cells) }
}

impl From<Grid> for [[Tile; SIZE]; SIZE] {
    fn from(g: Grid) -> Self { g.0 }
}

impl TryFrom<Vec<Vec<i64>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            let cols = rows.first().map_or(0, Vec::len);
            return Err(GridError::WrongDimensions { rows: rows.len(), cols });
        }
        let mut grid = Grid::EMPTY;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != SIZE {
                return Err(GridError::WrongDimensions { rows: rows.len(), cols: row.len() });
            }
            for (c, &value) in row.iter().enumerate() {
                grid.0[r][c] = checked_tile(r, c, value)?;
            }
        }
        Ok(grid)
    }
}

/// Row-major flat slice of exactly 16 values.
impl TryFrom<&[i64]> for Grid {
    type Error = GridError;

    fn try_from(cells: &[i64]) -> Result<Self, Self::Error> {
        if cells.len() != SIZE * SIZE {
            return Err(GridError::WrongDimensions { rows: cells.len() / SIZE, cols: SIZE });
        }
        let mut grid = Grid::EMPTY;
        for (idx, &value) in cells.iter().enumerate() {
            let (r, c) = (idx / SIZE, idx % SIZE);
            grid.0[r][c] = checked_tile(r, c, value)?;
        }
        Ok(grid)
    }
}

fn checked_tile(row: usize, col: usize, value: i64) -> Result<Tile, GridError> {
    if value < 0 {
        return Err(GridError::NegativeTile { row, col, value });
    }
    Tile::try_from(value).map_err(|_| GridError::TileOutOfRange { row, col, value })
}

/// Slide/merge tiles in the given direction. No randomness.
#[inline]
pub fn apply(grid: Grid, dir: Direction) -> MoveOutcome { grid.apply(dir) }

/// Spawn a 2 into a random empty cell using thread-local RNG.
///
/// For reproducible behavior, prefer [`Grid::with_random_tile`].
pub fn spawn(grid: Grid) -> Result<Grid, GridError> {
    let mut rng = rand::thread_rng();
    grid.with_random_tile(&mut rng)
}

/// Terminal classification of a grid.
#[inline]
pub fn status(grid: Grid) -> GameStatus { grid.status() }
