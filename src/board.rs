//! Game board representation and collision detection
//!
//! The board is a stack of bitmask rows, row 0 at the top. Pieces are moved
//! optimistically: shift, probe for collision, undo on failure.

use crate::error::{EngineError, Result};
use crate::piece::Piece;
use crate::row::{Color, Row};
use crate::rows::RowSequence;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Cells a piece was committed to, as `(row, col)`.
///
/// Returned by [`Board::place_piece`]; handing it back on the next placement
/// erases the old footprint first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    cells: [(usize, usize); 4],
}

impl Placement {
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    height: usize,
    width: usize,
    rows: RowSequence,
    /// Template for rows inserted at the top after a clear
    blank: Row,
    lines_cleared: u32,
}

impl Board {
    /// Create an empty board of `height` rows and `width` columns
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Self::with_row_factory(height, width, || Row::new(width))
    }

    /// Create an empty board whose rows come from `factory`.
    /// Every produced row must be empty and exactly `width` wide.
    pub fn with_row_factory<F>(height: usize, width: usize, factory: F) -> Result<Self>
    where
        F: Fn() -> Result<Row>,
    {
        if height == 0 || width == 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "board dimensions must be positive, got {height}x{width}"
            )));
        }

        let mut rows = RowSequence::with_capacity(height);
        for _ in 0..height {
            let row = factory()?;
            if row.width() != width || !row.is_empty() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "row factory must produce empty rows {width} wide, got width {}",
                    row.width()
                )));
            }
            rows.append(row)?;
        }
        let blank = rows.get(0)?.clone();

        Ok(Self {
            height,
            width,
            rows,
            blank,
            lines_cleared: 0,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total rows removed by `clear_full_lines` over the board's life
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<bool> {
        self.rows.get(row)?.get_bit(col)
    }

    pub fn get_color(&self, row: usize, col: usize) -> Result<Option<Color>> {
        self.rows.get(row)?.get_color(col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, color: Color) -> Result<()> {
        self.rows.get_mut(row)?.set_bit(col, color)
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.rows.get_mut(row)?.clear_bit(col)
    }

    /// Empty every row. Dimensions and the cleared-lines total are kept.
    pub fn clear(&mut self) {
        for index in 0..self.rows.len() {
            if let Ok(row) = self.rows.get_mut(index) {
                row.clear();
            }
        }
    }

    /// Check if the board holds no occupied cell
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Row::is_empty)
    }

    /// Remove every full row and refill from the top with empty rows.
    /// Rows that survive keep their relative order. Returns the count removed.
    pub fn clear_full_lines(&mut self) -> Result<usize> {
        let mut removed = 0;
        let mut index = 0;
        while index < self.rows.len() {
            if self.rows.get(index)?.is_full() {
                // The next row slides into `index`, so don't advance
                self.rows.delete_at(index)?;
                removed += 1;
            } else {
                index += 1;
            }
        }

        for _ in 0..removed {
            self.rows.insert_front(self.blank.clone())?;
        }

        if self.rows.len() != self.height {
            return Err(EngineError::InvariantViolation {
                expected: self.height,
                actual: self.rows.len(),
            });
        }

        self.lines_cleared += removed as u32;
        Ok(removed)
    }

    /// Out of bounds counts as blocked
    fn is_blocked(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return true;
        }
        match self.rows.get(row as usize) {
            Ok(r) => r.get_bit(col as usize).unwrap_or(true),
            Err(_) => true,
        }
    }

    fn collides_at(&self, piece: &Piece, y: i32) -> bool {
        piece
            .cells_at(y)
            .iter()
            .any(|&(row, col)| self.is_blocked(row, col))
    }

    /// Check if any cell of `piece` is off the board or already occupied
    pub fn will_piece_collide(&self, piece: &Piece) -> bool {
        self.collides_at(piece, piece.y)
    }

    /// Commit `piece` to the board with its color.
    ///
    /// When `previous` is given its cells are cleared first. They stay
    /// cleared even if the new position collides, in which case `None` is
    /// returned and nothing else changes.
    pub fn place_piece(&mut self, piece: &Piece, previous: Option<&Placement>) -> Option<Placement> {
        if let Some(previous) = previous {
            for &(row, col) in previous.cells() {
                if let Err(e) = self.clear_cell(row, col) {
                    tracing::warn!("stale placement cell ({row}, {col}): {e}");
                }
            }
        }

        if self.will_piece_collide(piece) {
            return None;
        }

        // In bounds: the collision probe just checked every cell
        let cells = piece.cells().map(|(row, col)| (row as usize, col as usize));
        for &(row, col) in &cells {
            self.set_cell(row, col, piece.color).ok()?;
        }
        Some(Placement { cells })
    }

    /// Move one row down. On collision the piece stays put and is committed
    /// to the board; returns `false` to signal it has landed.
    pub fn go_down(&mut self, piece: &mut Piece) -> bool {
        piece.y += 1;
        if self.will_piece_collide(piece) {
            piece.y -= 1;
            if self.place_piece(piece, None).is_none() {
                tracing::warn!(x = piece.x, y = piece.y, "landed piece overlaps the stack");
            }
            return false;
        }
        true
    }

    /// Shift sideways by `dx`; silently stays put if blocked
    pub fn go_side(&mut self, dx: i32, piece: &mut Piece) {
        piece.x += dx;
        if self.will_piece_collide(piece) {
            piece.x -= dx;
        }
    }

    /// Advance to the next rotation variant; silently stays put if blocked
    pub fn rotate(&mut self, piece: &mut Piece) {
        piece.rotate();
        if self.will_piece_collide(piece) {
            piece.rotate_back();
        }
    }

    /// Hard drop: fall as far as possible and commit
    pub fn go_space(&mut self, piece: &mut Piece) -> Option<Placement> {
        piece.y = self.get_landing_y(piece);
        let placement = self.place_piece(piece, None);
        if placement.is_none() {
            tracing::warn!(x = piece.x, y = piece.y, "dropped piece overlaps the stack");
        }
        placement
    }

    /// Row the piece's box would rest at after a hard drop. Read-only.
    pub fn get_landing_y(&self, piece: &Piece) -> i32 {
        let mut y = piece.y;
        while !self.collides_at(piece, y + 1) {
            y += 1;
        }
        y
    }

    /// Cells the piece would occupy after a hard drop. Read-only.
    pub fn get_ghost_cells(&self, piece: &Piece) -> [(i32, i32); 4] {
        piece.cells_at(self.get_landing_y(piece))
    }
}
