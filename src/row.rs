//! A single board row packed into a bitmask
//!
//! Bit `i` of the mask is set when column `i` is occupied. Colors are kept
//! per column and only exist for occupied columns.

use crate::error::{check_index, Axis, EngineError, Result};

/// Opaque palette index. The core never interprets it.
pub type Color = u8;

/// Widest row the `u64` mask can hold
pub const MAX_WIDTH: usize = u64::BITS as usize;

/// One row of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    bits: u64,
    full_mask: u64,
    colors: Vec<Option<Color>>,
}

impl Row {
    /// Create an empty row `width` columns wide
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(EngineError::InvalidConfiguration(format!(
                "row width must be in 1..={MAX_WIDTH}, got {width}"
            )));
        }
        let full_mask = if width == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Ok(Self {
            bits: 0,
            full_mask,
            colors: vec![None; width],
        })
    }

    pub fn width(&self) -> usize {
        self.colors.len()
    }

    /// Raw occupancy mask
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Mark `col` occupied with `color`
    pub fn set_bit(&mut self, col: usize, color: Color) -> Result<()> {
        check_index(Axis::Column, col, self.width())?;
        self.bits |= 1 << col;
        self.colors[col] = Some(color);
        Ok(())
    }

    /// Unmark `col` and drop its color. Clearing a clear column is a no-op.
    pub fn clear_bit(&mut self, col: usize) -> Result<()> {
        check_index(Axis::Column, col, self.width())?;
        self.bits &= !(1 << col);
        self.colors[col] = None;
        Ok(())
    }

    pub fn get_bit(&self, col: usize) -> Result<bool> {
        check_index(Axis::Column, col, self.width())?;
        Ok(self.bits & (1 << col) != 0)
    }

    /// Color at `col`, or `None` when the column is empty
    pub fn get_color(&self, col: usize) -> Result<Option<Color>> {
        check_index(Axis::Column, col, self.width())?;
        Ok(self.colors[col])
    }

    pub fn is_full(&self) -> bool {
        self.bits == self.full_mask
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Empty every column
    pub fn clear(&mut self) {
        self.bits = 0;
        self.colors.fill(None);
    }
}
