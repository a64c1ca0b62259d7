//! Game state and placement rules.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::shape::Shape;

/// Board width and height in cells.
pub const GRID_SIZE: usize = 8;

/// Number of pieces offered at once.
pub const TRAY_SIZE: usize = 3;

const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub column: usize,
    pub row: usize,
}

impl Coord {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Row-major index into the board.
    pub fn to_index(self) -> usize {
        self.row * GRID_SIZE + self.column
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            column: index % GRID_SIZE,
            row: index / GRID_SIZE,
        }
    }

    fn in_bounds(self) -> bool {
        self.column < GRID_SIZE && self.row < GRID_SIZE
    }
}

/// A piece in the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub used: bool,
}

impl Piece {
    fn random(rng: &mut SmallRng) -> Self {
        let idx = rng.random_range(0..Shape::ALL.len());
        Self {
            shape: Shape::ALL[idx],
            used: false,
        }
    }
}

/// A Koala Kombo game.
#[derive(Debug, Clone)]
pub struct KoalaKombo {
    board: [bool; CELL_COUNT],
    pub pieces: [Piece; TRAY_SIZE],
    pub score: u32,
    rng: SmallRng,
}

impl KoalaKombo {
    /// Start a game seeded from the system clock.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Start a game with a deterministic piece sequence.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pieces = Self::deal(&mut rng);
        Self {
            board: [false; CELL_COUNT],
            pieces,
            score: 0,
            rng,
        }
    }

    fn deal(rng: &mut SmallRng) -> [Piece; TRAY_SIZE] {
        [Piece::random(rng), Piece::random(rng), Piece::random(rng)]
    }

    pub fn cell_filled(&self, pos: Coord) -> bool {
        pos.in_bounds() && self.board[pos.to_index()]
    }

    /// Number of filled cells on the board.
    pub fn filled_count(&self) -> usize {
        self.board.iter().filter(|&&filled| filled).count()
    }

    /// Cells the piece would cover if anchored at `anchor`.
    ///
    /// Returns `None` if the piece index is invalid or any cell falls off the
    /// board. Overlap with filled cells is not checked here, so callers can
    /// preview a blocked placement.
    pub fn can_place(&self, piece_idx: usize, anchor: Coord) -> Option<Vec<Coord>> {
        let piece = self.pieces.get(piece_idx)?;

        piece
            .shape
            .cells()
            .iter()
            .map(|offset| {
                let column = anchor.column.checked_add(offset.column)?;
                let row = anchor.row.checked_add(offset.row)?;
                let pos = Coord::new(column, row);
                pos.in_bounds().then_some(pos)
            })
            .collect()
    }

    /// Place a piece. Returns `true` if the placement was legal.
    ///
    /// A legal placement fills the cells, marks the piece used, clears every
    /// full row and column, adds to the score and deals a new tray once all
    /// pieces are used.
    pub fn place_shape(&mut self, piece_idx: usize, anchor: Coord) -> bool {
        if self.pieces.get(piece_idx).is_none_or(|p| p.used) {
            return false;
        }

        let Some(cells) = self.can_place(piece_idx, anchor) else {
            return false;
        };

        if cells.iter().any(|&pos| self.cell_filled(pos)) {
            return false;
        }

        for pos in cells {
            self.board[pos.to_index()] = true;
        }

        self.pieces[piece_idx].used = true;
        self.score += self.clear_lines();

        if self.pieces.iter().all(|p| p.used) {
            self.pieces = Self::deal(&mut self.rng);
        }

        true
    }

    /// Clear all complete rows and columns, returning the points earned.
    ///
    /// Lines are collected before any is cleared, so a row and a column
    /// completed by the same placement both count.
    fn clear_lines(&mut self) -> u32 {
        let full_rows: Vec<usize> = (0..GRID_SIZE)
            .filter(|&row| (0..GRID_SIZE).all(|column| self.board[Coord::new(column, row).to_index()]))
            .collect();
        let full_columns: Vec<usize> = (0..GRID_SIZE)
            .filter(|&column| (0..GRID_SIZE).all(|row| self.board[Coord::new(column, row).to_index()]))
            .collect();

        for &row in &full_rows {
            for column in 0..GRID_SIZE {
                self.board[Coord::new(column, row).to_index()] = false;
            }
        }
        for &column in &full_columns {
            for row in 0..GRID_SIZE {
                self.board[Coord::new(column, row).to_index()] = false;
            }
        }

        ((full_rows.len() + full_columns.len()) * GRID_SIZE) as u32
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for KoalaKombo {
    fn default() -> Self {
        Self::new()
    }
}
