//! Terminal UI rendering with ratatui
//!
//! Reads game state only; nothing here mutates the game.

use blockfall::settings::Settings;
use blockfall::{Color as PaletteIndex, Game, GameState, Piece};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";
/// Right-hand column: next piece box and stats
const SIDE_WIDTH: u16 = 16;

/// Terminal color for a palette index; 0 is the empty-cell color
fn palette(index: PaletteIndex) -> Color {
    match index {
        1 => Color::Rgb(120, 37, 179),  // purple
        2 => Color::Rgb(100, 179, 179), // teal
        3 => Color::Rgb(180, 100, 40),  // brown
        4 => Color::Rgb(80, 134, 22),   // green
        5 => Color::Rgb(180, 34, 22),   // red
        6 => Color::Rgb(180, 34, 122),  // pink
        _ => Color::Black,
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the title screen
pub fn render_start_screen(frame: &mut Frame, game: &Game) {
    let area = center_rect(frame.area(), 40, 9);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::raw(""),
        Line::styled("B L O C K F A L L", Style::default().fg(Color::Cyan).bold()),
        Line::raw(""),
        Line::styled(
            format!("Best: {}", game.high_score()),
            Style::default().fg(Color::Yellow),
        ),
        Line::raw(""),
        Line::styled("Enter to start, q to quit", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render the board, side panel and any overlay
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let board = game.board();
    let board_width = board.width() as u16 * 2 + 2;
    let board_height = board.height() as u16 + 2;

    let game_area = center_rect(area, board_width + SIDE_WIDTH, board_height);
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(SIDE_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let side_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(10)])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, side_layout[0], game.next_piece(), block_char);
    render_stats(frame, side_layout[1], game);

    match game.state() {
        GameState::Playing { paused: true } => {
            render_overlay(frame, area, "PAUSED", "p or Enter to resume")
        }
        GameState::GameOver => render_overlay(frame, area, "GAME OVER", "r to restart"),
        _ => {}
    }
}

fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let board = game.board();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = game.current_piece();
    let piece_cells = piece.map(Piece::cells).unwrap_or_default();
    let ghost_cells = match piece {
        Some(p) if settings.visual.show_ghost && game.state() != GameState::GameOver => {
            board.get_ghost_cells(p)
        }
        _ => Default::default(),
    };
    let piece_color = piece.map(|p| palette(p.color)).unwrap_or(Color::White);
    let show_piece = piece.is_some() && game.state() != GameState::GameOver;

    let mut lines = Vec::with_capacity(board.height());
    for row in 0..board.height() {
        let mut spans = Vec::with_capacity(board.width());
        for col in 0..board.width() {
            let here = (row as i32, col as i32);
            let span = if show_piece && piece_cells.contains(&here) {
                Span::styled(block_char, Style::default().fg(piece_color))
            } else if let Ok(Some(color)) = board.get_color(row, col) {
                Span::styled(block_char, Style::default().fg(palette(color)))
            } else if show_piece && ghost_cells.contains(&here) {
                Span::styled(ghost_char, Style::default().fg(piece_color).dim())
            } else {
                Span::raw(EMPTY)
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next piece in a small box
fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };

    // Draw the shape relative to its own box
    let style = Style::default().fg(palette(piece.color));
    let cells = piece.kind.cells(piece.rotation);
    let lines: Vec<Line> = (0..4)
        .map(|row| {
            let spans: Vec<Span> = (0..4)
                .map(|col| {
                    if cells.contains(&(row, col)) {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn stat<'a>(label: &'a str, value: String, color: Color) -> [Line<'a>; 3] {
    [
        Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(value, Style::default().fg(color).bold())),
        Line::raw(""),
    ]
}

fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    lines.extend(stat("SCORE", game.score().to_string(), Color::Yellow));
    lines.extend(stat("BEST", game.high_score().to_string(), Color::Magenta));
    lines.extend(stat("LEVEL", game.level().to_string(), Color::Cyan));
    lines.extend(stat("LINES", game.lines_cleared().to_string(), Color::Green));
    lines.extend(stat(
        "MULTIPLIER",
        format!("x{:.1}", game.get_score_multiplier()),
        Color::White,
    ));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 26, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
