//! BLOCKFALL - terminal front-end
//!
//! Owns the terminal, the fixed-rate tick loop, and the settings file.
//! All game rules live in the library.

mod input;
mod ui;

use blockfall::{Board, Game, GameState, HighScore, Settings, Spawner};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::KeyMap;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

/// Get the blockfall temp directory, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // The terminal belongs to the UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // An unreadable file is left alone: play on defaults, don't save over it
    let (mut settings, writable) = match Settings::load() {
        Ok(settings) => (settings, true),
        Err(e) => {
            tracing::warn!("using default settings: {}", e);
            eprintln!("Warning: {}; using defaults, settings will not be saved", e);
            (Settings::default(), false)
        }
    };
    let high_score = Arc::new(HighScore::new(settings.best_score));

    // Bad dimensions fail before the terminal is touched
    let board = Board::new(settings.board.height, settings.board.width).map_err(io::Error::other)?;
    let mut spawner = Spawner::new(settings.board.width);
    let mut game = Game::new(board, move || spawner.next(), Arc::clone(&high_score));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &settings);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = &result {
        tracing::error!("game loop failed: {}", e);
    }

    if writable {
        settings.best_score = high_score.high_score();
        if let Err(e) = settings.save() {
            eprintln!("Warning: Could not save settings: {}", e);
        }
    }

    println!("\nThanks for playing BLOCKFALL!");
    println!("Final Score: {}", game.score());
    println!("Level: {} | Lines: {}", game.level(), game.lines_cleared());
    println!("Best: {}", high_score.high_score());

    result
}

/// Fixed-rate loop: gather input until the tick is due, then apply the
/// batch, run one gravity step, and draw
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
) -> io::Result<()> {
    let keymap = KeyMap::from_settings(&settings.keys);
    let tick = Duration::from_secs(1) / settings.gameplay.fps.max(1);
    let mut next_tick = Instant::now() + tick;
    let mut intents = Vec::new();

    loop {
        terminal.draw(|frame| match game.state() {
            GameState::StartScreen => ui::render_start_screen(frame, game),
            _ => ui::render_game(frame, game, settings),
        })?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            intents.extend(keymap.translate(&event::read()?));
            if Instant::now() < next_tick {
                continue;
            }
        }

        game.apply(intents.drain(..)).map_err(io::Error::other)?;
        game.update().map_err(io::Error::other)?;
        next_tick += tick;

        if game.done() {
            return Ok(());
        }
    }
}
