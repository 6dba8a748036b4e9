//! Terminal UI rendering with ratatui
//!
//! Purely a reader of `Game`; nothing here mutates the session.

use crate::board::Cell;
use crate::game::{Game, GameState};
use crate::settings::Settings;
use crate::tetromino::{Rotation, TetrominoType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";
const SIDE_WIDTH: u16 = 16;

/// Render the whole game screen
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let board = game.board();
    let board_width = to_u16(board.width()).saturating_mul(2).saturating_add(2);
    let board_height = to_u16(board.visible_height()).saturating_add(2);

    let game_area = center_rect(area, board_width.saturating_add(SIDE_WIDTH), board_height);
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(SIDE_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, right_layout[0], game.next_shape(), block_char);
    render_stats(frame, right_layout[1], game);

    match game.state() {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => render_overlay(frame, area, "GAME OVER", "Press Q to quit"),
        GameState::Playing => {}
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Center a rect within another rect
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

fn cell_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Empty => None,
        Cell::Filled(shape) => Some(shape.color()),
        Cell::Garbage => Some(Color::Gray),
    }
}

/// Render the visible rows of the board with the active and ghost pieces
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let board = game.board();
    let piece = game.active();
    let color = piece.piece_type.color();
    let active = piece.block_positions();
    let ghost = if settings.visual.show_ghost {
        let ghost_row = game.ghost_row();
        piece
            .piece_type
            .cell_offsets(piece.rotation)
            .map(|(dr, dc)| (ghost_row + dr, piece.col + dc))
            .to_vec()
    } else {
        Vec::new()
    };

    // Top row first on screen
    let lines: Vec<Line> = board
        .visible_rows()
        .iter()
        .enumerate()
        .rev()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, &cell)| {
                    let pos = (row as i32, col as i32);
                    if active.contains(&pos) {
                        Span::styled(block_char, Style::default().fg(color))
                    } else if ghost.contains(&pos) {
                        Span::styled(ghost_char, Style::default().fg(color).dim())
                    } else if let Some(filled) = cell_color(cell) {
                        Span::styled(block_char, Style::default().fg(filled))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, shape: TetrominoType, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let offsets = shape.cell_offsets(Rotation::North);
    let min_row = offsets.iter().map(|&(r, _)| r).min().unwrap_or(0);
    let max_row = offsets.iter().map(|&(r, _)| r).max().unwrap_or(0);

    let lines: Vec<Line> = (min_row..=max_row)
        .rev()
        .map(|row| {
            let spans: Vec<Span> = (0..shape.width())
                .map(|col| {
                    if offsets.contains(&(row, col)) {
                        Span::styled(block_char, Style::default().fg(shape.color()))
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

/// Render score, level and lines
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = game.score();
    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let mut lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        label("LEVEL"),
        Line::from(Span::styled(score.level.to_string(), Style::default().fg(Color::Cyan))),
        Line::raw(""),
        label("LINES"),
        Line::from(Span::styled(score.lines.to_string(), Style::default().fg(Color::Green))),
    ];

    if let Some(clear) = game.last_clear() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(clear.to_string(), Style::default().fg(Color::Magenta).bold()));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 24, 5);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_shows_stats() {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let game = Game::with_seed(4);
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, &game, &settings))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("SCORE"));
        assert!(text.contains("NEXT"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_render_pause_overlay_without_mutation() {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let mut game = Game::with_seed(4);
        game.pause_toggle();
        let piece = *game.active();
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, &game, &settings))
            .unwrap();
        assert!(screen_text(&terminal).contains("PAUSED"));
        assert_eq!(*game.active(), piece);
    }

    #[test]
    fn test_oversized_board_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let game = Game::new(GameConfig {
            width: 40000,
            visible_height: 4,
            ..GameConfig::default()
        });
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, &game, &settings))
            .unwrap();
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).unwrap();
        let game = Game::with_seed(4);
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, &game, &settings))
            .unwrap();
    }
}
