//! Ordered, fixed-capacity sequence of rows
//!
//! Index 0 is the top of the board. Boards are small (a couple dozen rows),
//! so inserting at the front and deleting from the middle simply shift the
//! backing array.

use crate::error::{check_index, Axis, EngineError, Result};
use crate::row::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSequence {
    rows: Vec<Row>,
    capacity: usize,
}

impl RowSequence {
    /// Create an empty sequence able to hold `capacity` rows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add a row at the bottom
    pub fn append(&mut self, row: Row) -> Result<()> {
        self.ensure_room()?;
        self.rows.push(row);
        Ok(())
    }

    /// Add a row at the top, shifting every other row down by one
    pub fn insert_front(&mut self, row: Row) -> Result<()> {
        self.ensure_room()?;
        self.rows.insert(0, row);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&Row> {
        check_index(Axis::Row, index, self.rows.len())?;
        Ok(&self.rows[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Row> {
        check_index(Axis::Row, index, self.rows.len())?;
        Ok(&mut self.rows[index])
    }

    /// Remove the row at `index`; rows below it keep their order and move up
    pub fn delete_at(&mut self, index: usize) -> Result<Row> {
        check_index(Axis::Row, index, self.rows.len())?;
        Ok(self.rows.remove(index))
    }

    /// Iterate from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    fn ensure_room(&self) -> Result<()> {
        if self.rows.len() >= self.capacity {
            return Err(EngineError::InvariantViolation {
                expected: self.capacity,
                actual: self.rows.len() + 1,
            });
        }
        Ok(())
    }
}
