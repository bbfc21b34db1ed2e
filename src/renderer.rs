use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::config::GridSize;
use crate::game::{GameStatus, Snapshot};
use crate::snake::Cell;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_victory_menu};

/// Terminal columns per grid cell; two keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

const GLYPH_SEGMENT: &str = "██";
const GLYPH_EMPTY: &str = "· ";

const SNAKE_HEAD: Color = Color::Rgb(0, 255, 0);
const SNAKE_BODY: Color = Color::Rgb(0, 200, 0);
const FOOD: Color = Color::Rgb(255, 0, 0);
const GRID_LINES: Color = Color::Rgb(40, 40, 40);
const BORDER: Color = Color::White;

/// Renders the full game frame from a snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot);

    let Some(board) = board_area(play_area, snapshot.grid) else {
        frame.render_widget(
            Paragraph::new("Terminal too small")
                .alignment(Alignment::Center)
                .style(Style::new().fg(FOOD)),
            play_area,
        );
        return;
    };

    let block = Block::bordered()
        .title(" Snake ")
        .border_style(Style::new().fg(BORDER));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_grid(frame, inner, snapshot.grid);
    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.status {
        GameStatus::GameOver => render_game_over_menu(frame, board, snapshot),
        GameStatus::Victory => render_victory_menu(frame, board, snapshot.score),
        GameStatus::Running => {}
    }
}

/// Centres a bordered board inside `area`, or `None` if it does not fit.
fn board_area(area: Rect, grid: GridSize) -> Option<Rect> {
    let width = grid.side.checked_mul(CELL_WIDTH)?.checked_add(2)?;
    let height = grid.side.checked_add(2)?;
    if width > area.width || height > area.height {
        return None;
    }

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    Some(board)
}

fn render_grid(frame: &mut Frame<'_>, inner: Rect, grid: GridSize) {
    let style = Style::new().fg(GRID_LINES);
    let buffer = frame.buffer_mut();

    for y in 0..grid.bound() {
        for x in 0..grid.bound() {
            if let Some((column, row)) = logical_to_terminal(inner, grid, Cell::new(x, y)) {
                buffer.set_string(column, row, GLYPH_EMPTY, style);
            }
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_SEGMENT, Style::new().fg(FOOD));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins if a dead snake overlaps itself.
    for (index, segment) in snapshot.segments.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        let style = if index == 0 {
            Style::new().fg(SNAKE_HEAD).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(SNAKE_BODY)
        };
        buffer.set_string(x, y, GLYPH_SEGMENT, style);
    }
}

fn logical_to_terminal(inner: Rect, grid: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within(grid) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
