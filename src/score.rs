//! Scoring, leveling and gravity rules, plus the session high score

use std::sync::atomic::{AtomicU64, Ordering};

/// Gravity delay at level 1, in ticks
pub const BASE_GRAVITY_DELAY: u32 = 30;
/// Gravity never gets faster than this
pub const MIN_GRAVITY_DELAY: u32 = 10;
/// Ticks shaved off the delay per level
const GRAVITY_STEP: u32 = 3;
/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;

/// Flat points for clearing `lines` rows at once, 0 outside 1..=4
pub fn points_for_clear(lines: usize) -> u64 {
    match lines {
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        _ => 0,
    }
}

/// Base of the level-scaled bonus, 0 outside 1..=4
fn level_bonus_base(lines: usize) -> u64 {
    match lines {
        1 => 40,
        2 => 100,
        3 => 300,
        4 => 1200,
        _ => 0,
    }
}

/// Ticks between automatic drops at `level`
pub fn gravity_delay(level: u32) -> u32 {
    BASE_GRAVITY_DELAY
        .saturating_sub(level.saturating_sub(1) * GRAVITY_STEP)
        .max(MIN_GRAVITY_DELAY)
}

/// Score tracking for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starting at 1
    pub level: u32,
    /// Total lines cleared this game
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// `1.0 + (level - 1) * 0.1`
    pub fn multiplier(&self) -> f64 {
        1.0 + self.level.saturating_sub(1) as f64 * 0.1
    }

    /// Add the flat points for a clear of `lines` rows
    pub fn add_clear(&mut self, lines: usize) -> u64 {
        let points = points_for_clear(lines);
        self.points += points;
        points
    }

    /// Bonus for `lines` rows scaled by the current multiplier, rounded down.
    /// Integer math keeps `base * 1.1` etc. exact.
    pub fn level_bonus(&self, lines: usize) -> u64 {
        let tenths = 10 + self.level.saturating_sub(1) as u64;
        level_bonus_base(lines) * tenths / 10
    }

    /// Count `lines` toward the level, add the level bonus, and level up if
    /// a threshold was crossed. Returns true on level-up.
    pub fn add_lines(&mut self, lines: usize) -> bool {
        if lines == 0 {
            return false;
        }
        self.points += self.level_bonus(lines);
        self.lines += lines as u32;

        let new_level = self.lines / LINES_PER_LEVEL + 1;
        if new_level > self.level {
            self.level = new_level;
            true
        } else {
            false
        }
    }
}

/// Best score seen this process run.
///
/// Shared by reference (usually `Arc<HighScore>`) between every game that
/// should report into it.
#[derive(Debug, Default)]
pub struct HighScore {
    best: AtomicU64,
}

impl HighScore {
    pub fn new(initial: u64) -> Self {
        Self {
            best: AtomicU64::new(initial),
        }
    }

    pub fn high_score(&self) -> u64 {
        self.best.load(Ordering::Relaxed)
    }

    /// Store `candidate` only if it beats the current best
    pub fn update_high_score(&self, candidate: u64) {
        self.best.fetch_max(candidate, Ordering::Relaxed);
    }
}
