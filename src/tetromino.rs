//! Tetromino definitions and shapes
//!
//! Every shape lives in a 4x4 box. A rotation variant lists the four occupied
//! cells of that box as `local_row * 4 + local_col`.

/// Side of the square box every shape is drawn in
pub const BOX_SIZE: i32 = 4;

/// The 7 tetromino types, in shape-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I,
    Z,
    S,
    L,
    J,
    T,
    O,
}

const I_SHAPE: &[[u8; 4]] = &[[1, 5, 9, 13], [4, 5, 6, 7]];
const Z_SHAPE: &[[u8; 4]] = &[[4, 5, 9, 10], [2, 6, 5, 9]];
const S_SHAPE: &[[u8; 4]] = &[[6, 7, 9, 10], [1, 5, 6, 10]];
const L_SHAPE: &[[u8; 4]] = &[[1, 2, 5, 9], [0, 4, 5, 6], [1, 5, 9, 8], [4, 5, 6, 10]];
const J_SHAPE: &[[u8; 4]] = &[[1, 2, 6, 10], [5, 6, 7, 9], [2, 6, 10, 11], [3, 5, 6, 7]];
const T_SHAPE: &[[u8; 4]] = &[[1, 4, 5, 6], [1, 4, 5, 9], [4, 5, 6, 9], [1, 5, 6, 9]];
// O looks the same from every side
const O_SHAPE: &[[u8; 4]] = &[[1, 2, 5, 6]];

impl TetrominoType {
    /// All types, indexable by `index()`
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::Z,
            TetrominoType::S,
            TetrominoType::L,
            TetrominoType::J,
            TetrominoType::T,
            TetrominoType::O,
        ]
    }

    /// Type for a shape-table index in `0..7`
    pub fn from_index(index: usize) -> Option<TetrominoType> {
        Self::all().get(index).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Every rotation variant, in rotation order
    pub fn variants(&self) -> &'static [[u8; 4]] {
        match self {
            TetrominoType::I => I_SHAPE,
            TetrominoType::Z => Z_SHAPE,
            TetrominoType::S => S_SHAPE,
            TetrominoType::L => L_SHAPE,
            TetrominoType::J => J_SHAPE,
            TetrominoType::T => T_SHAPE,
            TetrominoType::O => O_SHAPE,
        }
    }

    pub fn variant_count(&self) -> usize {
        self.variants().len()
    }

    /// Occupied `(local_row, local_col)` cells for a rotation.
    /// The rotation wraps, so any index is accepted.
    pub fn cells(&self, rotation: usize) -> [(i32, i32); 4] {
        let variants = self.variants();
        variants[rotation % variants.len()]
            .map(|i| (i as i32 / BOX_SIZE, i as i32 % BOX_SIZE))
    }
}
