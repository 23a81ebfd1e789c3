//! Core game state and logic
//!
//! `Game` turns batches of intents into board and piece mutations, runs one
//! gravity step per tick, and tracks score, level and the state machine.

use crate::board::Board;
use crate::error::Result;
use crate::piece::Piece;
use crate::score::{gravity_delay, HighScore, Score};
use std::sync::Arc;
use tracing::{debug, info};

/// Game state. Pausing only exists while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    StartScreen,
    Playing { paused: bool },
    GameOver,
}

/// Device-independent actions the game consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Left,
    Right,
    Down,
    SoftDown,
    Rotate,
    Drop,
    Pause,
    Resume,
    Click,
    Start,
    Restart,
    Quit,
}

impl Intent {
    /// Parse an upper-case token such as `"SOFT_DOWN"`.
    /// Unknown tokens give `None` and are meant to be ignored.
    pub fn from_token(token: &str) -> Option<Intent> {
        let intent = match token {
            "LEFT" => Intent::Left,
            "RIGHT" => Intent::Right,
            "DOWN" => Intent::Down,
            "SOFT_DOWN" => Intent::SoftDown,
            "ROTATE" => Intent::Rotate,
            "DROP" => Intent::Drop,
            "PAUSE" => Intent::Pause,
            "RESUME" => Intent::Resume,
            "CLICK" => Intent::Click,
            "START" => Intent::Start,
            "RESTART" => Intent::Restart,
            "QUIT" => Intent::Quit,
            _ => return None,
        };
        Some(intent)
    }
}

/// The main game struct
pub struct Game {
    board: Board,
    spawn: Box<dyn FnMut() -> Piece>,
    current_piece: Option<Piece>,
    next_piece: Option<Piece>,
    score: Score,
    /// Ticks since the last gravity step
    gravity_timer: u32,
    gravity_delay: u32,
    state: GameState,
    /// The enclosing application should exit
    done: bool,
    high_score: Arc<HighScore>,
}

impl Game {
    /// Create a game on the start screen. Pieces come from `spawn`.
    pub fn new<F>(board: Board, spawn: F, high_score: Arc<HighScore>) -> Self
    where
        F: FnMut() -> Piece + 'static,
    {
        Self {
            board,
            spawn: Box::new(spawn),
            current_piece: None,
            next_piece: None,
            score: Score::new(),
            gravity_timer: 0,
            gravity_delay: gravity_delay(1),
            state: GameState::StartScreen,
            done: false,
            high_score,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_piece.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score.points
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.score.lines
    }

    pub fn gravity_delay(&self) -> u32 {
        self.gravity_delay
    }

    pub fn gravity_timer(&self) -> u32 {
        self.gravity_timer
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, GameState::Playing { paused: true })
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Best score of the session, across every game sharing the sink
    pub fn high_score(&self) -> u64 {
        self.high_score.high_score()
    }

    pub fn get_score_multiplier(&self) -> f64 {
        self.score.multiplier()
    }

    /// Reset everything but the high-score sink and start playing
    pub fn start_new_game(&mut self) {
        self.board.clear();
        self.current_piece = Some((self.spawn)());
        self.next_piece = Some((self.spawn)());
        self.score = Score::new();
        self.gravity_timer = 0;
        self.gravity_delay = gravity_delay(self.score.level);
        self.state = GameState::Playing { paused: false };
        info!(
            width = self.board.width(),
            height = self.board.height(),
            "new game"
        );
    }

    /// Process one tick's worth of intents, in order
    pub fn apply<I>(&mut self, intents: I) -> Result<()>
    where
        I: IntoIterator<Item = Intent>,
    {
        for intent in intents {
            self.apply_one(intent)?;
        }
        Ok(())
    }

    fn apply_one(&mut self, intent: Intent) -> Result<()> {
        match self.state {
            GameState::StartScreen => match intent {
                Intent::Start => self.start_new_game(),
                Intent::Quit => self.done = true,
                _ => {}
            },
            GameState::GameOver => match intent {
                Intent::Restart => self.start_new_game(),
                Intent::Quit => self.done = true,
                _ => {}
            },
            GameState::Playing { paused } => match intent {
                Intent::Quit => self.done = true,
                Intent::Pause => self.state = GameState::Playing { paused: !paused },
                Intent::Resume | Intent::Click if paused => {
                    self.state = GameState::Playing { paused: false };
                }
                Intent::Restart => self.start_new_game(),
                _ if paused => {}
                Intent::Left => self.shift(-1),
                Intent::Right => self.shift(1),
                Intent::Down | Intent::SoftDown => self.soft_drop()?,
                Intent::Rotate => {
                    if let Some(piece) = self.current_piece.as_mut() {
                        self.board.rotate(piece);
                    }
                }
                Intent::Drop => self.hard_drop()?,
                Intent::Resume | Intent::Click | Intent::Start => {}
            },
        }
        Ok(())
    }

    /// Gravity tick (call once per frame, after `apply`). Frozen while
    /// paused or after game over; on the start screen only the timer runs.
    pub fn update(&mut self) -> Result<()> {
        if matches!(
            self.state,
            GameState::GameOver | GameState::Playing { paused: true }
        ) {
            return Ok(());
        }

        self.gravity_timer += 1;
        if self.gravity_timer >= self.gravity_delay {
            let falling = match self.current_piece.as_mut() {
                Some(piece) => self.board.go_down(piece),
                None => true,
            };
            if !falling {
                self.freeze()?;
            }
            self.gravity_timer = 0;
        }
        Ok(())
    }

    fn shift(&mut self, dx: i32) {
        if let Some(piece) = self.current_piece.as_mut() {
            self.board.go_side(dx, piece);
        }
    }

    fn soft_drop(&mut self) -> Result<()> {
        let landed = match self.current_piece.as_mut() {
            Some(piece) => !self.board.go_down(piece),
            None => false,
        };
        if landed {
            self.freeze()?;
        }
        Ok(())
    }

    fn hard_drop(&mut self) -> Result<()> {
        let Some(piece) = self.current_piece.as_mut() else {
            return Ok(());
        };
        self.board.go_space(piece);
        self.freeze()
    }

    /// The piece has been committed: clear lines, score, bring in the next
    /// piece, and end the game if it has no room
    fn freeze(&mut self) -> Result<()> {
        let cleared = self.board.clear_full_lines()?;
        if cleared > 0 {
            debug!(cleared, total = self.board.lines_cleared(), "lines cleared");
            self.update_score(cleared);
            self.update_level(cleared);
        }

        let next = match self.next_piece.take() {
            Some(piece) => piece,
            None => (self.spawn)(),
        };
        self.current_piece = Some(next);
        self.next_piece = Some((self.spawn)());
        debug!("piece frozen");

        let blocked = self
            .current_piece
            .as_ref()
            .is_some_and(|piece| self.board.will_piece_collide(piece));
        if blocked {
            self.state = GameState::GameOver;
            self.high_score.update_high_score(self.score.points);
            info!(
                score = self.score.points,
                level = self.score.level,
                lines = self.score.lines,
                "game over"
            );
        }
        Ok(())
    }

    /// Flat points for the clear
    fn update_score(&mut self, lines: usize) {
        if self.state == GameState::GameOver {
            return;
        }
        self.score.add_clear(lines);
        self.high_score.update_high_score(self.score.points);
    }

    /// Lines toward the level, the level-scaled bonus, and gravity on level-up
    fn update_level(&mut self, lines: usize) {
        if self.state == GameState::GameOver {
            return;
        }
        if self.score.add_lines(lines) {
            self.gravity_delay = gravity_delay(self.score.level);
            debug!(level = self.score.level, delay = self.gravity_delay, "level up");
        }
        self.high_score.update_high_score(self.score.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
    use crate::tetromino::TetrominoType;

    /// O pieces at the spawn column, each with the next color so they
    /// can be told apart
    fn counting_spawn() -> impl FnMut() -> Piece {
        let mut count: u8 = 0;
        move || {
            count = count.wrapping_add(1);
            Piece::new(TetrominoType::O, count, 3, 0)
        }
    }

    fn new_game() -> Game {
        Game::new(
            Board::new(BOARD_HEIGHT, BOARD_WIDTH).unwrap(),
            counting_spawn(),
            Arc::new(HighScore::default()),
        )
    }

    fn playing_game() -> Game {
        let mut game = new_game();
        game.apply([Intent::Start]).unwrap();
        game
    }

    fn fill_row(game: &mut Game, row: usize) {
        for col in 0..game.board.width() {
            game.board.set_cell(row, col, 1).unwrap();
        }
    }

    /// Fill `row` except the two columns the spawned O drops into
    fn fill_row_around_well(game: &mut Game, row: usize) {
        for col in (0..game.board.width()).filter(|col| !(4..6).contains(col)) {
            game.board.set_cell(row, col, 1).unwrap();
        }
    }

    #[test]
    fn test_start_screen_ignores_play_intents() {
        let mut game = new_game();
        game.apply([Intent::Left, Intent::Drop, Intent::Pause, Intent::Restart])
            .unwrap();
        assert_eq!(game.state(), GameState::StartScreen);
        assert!(game.current_piece().is_none());
    }

    #[test]
    fn test_start_screen_ticks_timer_only() {
        let mut game = new_game();
        game.update().unwrap();
        game.update().unwrap();
        assert_eq!(game.gravity_timer(), 2);
        assert_eq!(game.state(), GameState::StartScreen);
        assert!(game.current_piece().is_none());

        // A full gravity period with no piece just wraps the timer
        for _ in 2..30 {
            game.update().unwrap();
        }
        assert_eq!(game.gravity_timer(), 0);
        assert!(game.board().is_empty());

        game.apply([Intent::Start]).unwrap();
        assert_eq!(game.gravity_timer(), 0);
    }

    #[test]
    fn test_start_begins_playing() {
        let game = playing_game();
        assert_eq!(game.state(), GameState::Playing { paused: false });
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lines_cleared(), 0);
        assert_eq!(game.gravity_delay(), 30);
        assert_eq!(game.current_piece().unwrap().color, 1);
        assert_eq!(game.next_piece().unwrap().color, 2);
    }

    #[test]
    fn test_quit_from_any_state() {
        let mut game = new_game();
        game.apply([Intent::Quit]).unwrap();
        assert!(game.done());

        let mut game = playing_game();
        game.apply([Intent::Pause, Intent::Quit]).unwrap();
        assert!(game.done());
    }

    #[test]
    fn test_drop_promotes_next_piece() {
        let mut game = playing_game();
        let next = game.next_piece().cloned().unwrap();
        game.apply([Intent::Drop]).unwrap();

        let current = game.current_piece().unwrap();
        assert_eq!(current, &next);
        let fresh = game.next_piece().unwrap();
        assert_ne!(fresh, current);
        assert_eq!(fresh.color, 3);
        // The dropped O rests on the floor
        assert!(game.board().get_cell(19, 4).unwrap());
        assert!(game.board().get_cell(18, 5).unwrap());
    }

    #[test]
    fn test_movement() {
        let mut game = playing_game();
        game.apply([Intent::Left, Intent::Left]).unwrap();
        assert_eq!(game.current_piece().unwrap().x, 1);
        game.apply([Intent::Right]).unwrap();
        assert_eq!(game.current_piece().unwrap().x, 2);
        game.apply([Intent::Down, Intent::SoftDown]).unwrap();
        assert_eq!(game.current_piece().unwrap().y, 2);
        game.apply([Intent::Rotate]).unwrap();
        assert_eq!(game.current_piece().unwrap().rotation, 0);
    }

    #[test]
    fn test_soft_drop_into_floor_freezes() {
        let mut game = playing_game();
        for _ in 0..18 {
            game.apply([Intent::SoftDown]).unwrap();
        }
        assert_eq!(game.current_piece().unwrap().y, 18);
        assert_eq!(game.current_piece().unwrap().color, 1);

        game.apply([Intent::SoftDown]).unwrap();
        assert_eq!(game.current_piece().unwrap().color, 2);
        assert!(game.board().get_cell(19, 4).unwrap());
    }

    #[test]
    fn test_pause_blocks_movement_and_gravity() {
        let mut game = playing_game();
        game.apply([Intent::Pause]).unwrap();
        assert!(game.is_paused());

        game.apply([Intent::Left, Intent::Drop, Intent::Rotate]).unwrap();
        for _ in 0..100 {
            game.update().unwrap();
        }
        let piece = game.current_piece().unwrap();
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(game.gravity_timer(), 0);

        game.apply([Intent::Resume]).unwrap();
        assert!(!game.is_paused());
        game.apply([Intent::Pause, Intent::Click]).unwrap();
        assert!(!game.is_paused());
        game.apply([Intent::Pause, Intent::Pause]).unwrap();
        assert!(!game.is_paused());
    }

    #[test]
    fn test_restart_while_playing() {
        let mut game = playing_game();
        game.apply([Intent::Drop, Intent::Restart]).unwrap();
        assert_eq!(game.state(), GameState::Playing { paused: false });
        assert!(game.board().is_empty());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_gravity_fires_after_delay() {
        let mut game = playing_game();
        for _ in 0..29 {
            game.update().unwrap();
        }
        assert_eq!(game.current_piece().unwrap().y, 0);
        assert_eq!(game.gravity_timer(), 29);

        game.update().unwrap();
        assert_eq!(game.current_piece().unwrap().y, 1);
        assert_eq!(game.gravity_timer(), 0);
    }

    #[test]
    fn test_gravity_lands_piece() {
        let mut game = playing_game();
        // 18 steps to the floor, one more to land
        for _ in 0..19 * 30 {
            game.update().unwrap();
        }
        assert_eq!(game.current_piece().unwrap().color, 2);
        assert!(game.board().get_cell(19, 5).unwrap());
    }

    #[test]
    fn test_update_level() {
        let mut game = playing_game();
        assert_eq!(game.gravity_delay(), 30);
        game.update_level(10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.gravity_delay(), 27);
        assert_eq!(game.lines_cleared(), 10);
        assert!((game.get_score_multiplier() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_level_up_through_drops() {
        let mut game = playing_game();
        for drop in 1..=5 {
            fill_row_around_well(&mut game, 18);
            fill_row_around_well(&mut game, 19);
            game.apply([Intent::Drop]).unwrap();
            assert!(game.board().is_empty());
            // Two lines at level 1: 300 flat + 100 bonus
            assert_eq!(game.score(), 400 * drop);
        }
        assert_eq!(game.lines_cleared(), 10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.gravity_delay(), 27);

        fill_row_around_well(&mut game, 19);
        game.apply([Intent::Drop]).unwrap();
        assert_eq!(game.lines_cleared(), 11);
        // 100 flat + 40 scaled by 1.1
        assert_eq!(game.score(), 2000 + 100 + 44);
        assert_eq!(game.high_score(), 2144);
    }

    #[test]
    fn test_freeze_scores_both_tables() {
        let mut game = playing_game();
        fill_row(&mut game, 19);
        fill_row(&mut game, 18);
        game.freeze().unwrap();
        // 300 flat + 100 bonus
        assert_eq!(game.score(), 400);
        assert_eq!(game.board().lines_cleared(), 2);
        assert_eq!(game.high_score(), 400);
    }

    #[test]
    fn test_score_accumulates_across_freezes() {
        let mut game = playing_game();
        fill_row(&mut game, 19);
        game.freeze().unwrap();
        assert_eq!(game.score(), 140);

        for row in 17..20 {
            fill_row(&mut game, row);
        }
        game.freeze().unwrap();
        assert_eq!(game.score(), 940);
        assert_eq!(game.lines_cleared(), 4);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut game = playing_game();
        game.board.set_cell(1, 4, 6).unwrap();
        game.update_score(4);
        game.freeze().unwrap();
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.high_score(), 800);

        // Frozen: no scoring, no movement, no gravity
        game.update_score(4);
        game.update_level(4);
        assert_eq!(game.score(), 800);
        let before = game.current_piece().cloned();
        game.apply([Intent::Left, Intent::Drop, Intent::Pause]).unwrap();
        game.update().unwrap();
        assert_eq!(game.current_piece().cloned(), before);
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = playing_game();
        game.board.set_cell(1, 4, 6).unwrap();
        game.update_score(4);
        game.freeze().unwrap();
        assert_eq!(game.state(), GameState::GameOver);

        game.apply([Intent::Restart]).unwrap();
        assert_eq!(game.state(), GameState::Playing { paused: false });
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        let current = game.current_piece().unwrap();
        let next = game.next_piece().unwrap();
        assert_ne!(current, next);
        // The session best survives the restart
        assert_eq!(game.high_score(), 800);
    }

    #[test]
    fn test_high_score_shared_between_games() {
        let best = Arc::new(HighScore::default());
        let mut a = Game::new(
            Board::new(BOARD_HEIGHT, BOARD_WIDTH).unwrap(),
            counting_spawn(),
            Arc::clone(&best),
        );
        let b = Game::new(
            Board::new(BOARD_HEIGHT, BOARD_WIDTH).unwrap(),
            counting_spawn(),
            Arc::clone(&best),
        );
        a.apply([Intent::Start]).unwrap();
        fill_row(&mut a, 19);
        a.freeze().unwrap();
        assert_eq!(b.high_score(), 140);
    }

    #[test]
    fn test_intent_tokens() {
        assert_eq!(Intent::from_token("SOFT_DOWN"), Some(Intent::SoftDown));
        assert_eq!(Intent::from_token("QUIT"), Some(Intent::Quit));
        assert_eq!(Intent::from_token("JUMP"), None);
        assert_eq!(Intent::from_token("left"), None);

        let mut game = new_game();
        let intents = ["JUMP", "START"].into_iter().filter_map(Intent::from_token);
        game.apply(intents).unwrap();
        assert_eq!(game.state(), GameState::Playing { paused: false });
    }
}
