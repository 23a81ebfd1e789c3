//! The falling piece
//!
//! A piece is plain data: where its 4x4 box sits, which shape and rotation it
//! shows, and its color. It never looks at the board; the board moves it.

use crate::row::Color;
use crate::tetromino::TetrominoType;
use rand::Rng;

/// Number of palette entries. Index 0 is reserved for empty cells.
pub const PALETTE_SIZE: Color = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Column of the box's top-left corner
    pub x: i32,
    /// Row of the box's top-left corner, 0 is the top of the board
    pub y: i32,
    pub kind: TetrominoType,
    /// Index into `kind.variants()`
    pub rotation: usize,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: TetrominoType, color: Color, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind,
            rotation: 0,
            color,
        }
    }

    /// A piece of uniformly random type and color, unrotated
    pub fn random<R: Rng + ?Sized>(rng: &mut R, x: i32, y: i32) -> Self {
        let all = TetrominoType::all();
        let kind = all[rng.gen_range(0..all.len())];
        let color = rng.gen_range(1..PALETTE_SIZE);
        Self::new(kind, color, x, y)
    }

    /// Absolute `(row, col)` cells the piece covers at its current position
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.cells_at(self.y)
    }

    /// Cells the piece would cover if its box top were at row `y`
    pub fn cells_at(&self, y: i32) -> [(i32, i32); 4] {
        self.kind
            .cells(self.rotation)
            .map(|(row, col)| (y + row, self.x + col))
    }

    pub fn variant_count(&self) -> usize {
        self.kind.variant_count()
    }

    /// Advance to the next rotation variant
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % self.variant_count();
    }

    /// Undo `rotate`
    pub fn rotate_back(&mut self) {
        let count = self.variant_count();
        self.rotation = (self.rotation + count - 1) % count;
    }
}
