//! Random piece generation
//!
//! Each spawn is an independent uniform pick of shape and color; there is no
//! bag. Pieces appear with their box centred at the top of the board.

use crate::piece::Piece;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Produces fresh pieces at the spawn position
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
    x: i32,
    y: i32,
}

impl Spawner {
    /// Spawner for a board `width` columns wide, seeded from the OS
    pub fn new(width: usize) -> Self {
        Self::from_rng(width, ChaCha8Rng::from_entropy())
    }

    /// Reproducible spawner, mostly for tests
    pub fn with_seed(width: usize, seed: u64) -> Self {
        Self::from_rng(width, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(width: usize, rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            x: spawn_column(width),
            y: 0,
        }
    }

    pub fn next(&mut self) -> Piece {
        Piece::random(&mut self.rng, self.x, self.y)
    }
}

/// Column of the box's left edge that centres a 4-wide box
pub fn spawn_column(width: usize) -> i32 {
    width as i32 / 2 - 2
}
