use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::game::Snapshot;
use crate::snake::DeathReason;

const GAME_OVER_TITLE: &str = "GAME OVER! Press R to restart";
const VICTORY_TITLE: &str = "YOU WIN! Press R to play again";

/// Draws the game-over popup centred on `area`.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let cause = match snapshot.death_reason {
        Some(DeathReason::Wall) => "Cause: hit wall",
        Some(DeathReason::SelfCollision) => "Cause: hit yourself",
        None => "",
    };
    let score = format!("Score: {}", snapshot.score);

    render_popup(frame, area, GAME_OVER_TITLE, Color::Red, &[score.as_str(), cause]);
}

/// Draws the popup shown once the snake fills the grid.
pub fn render_victory_menu(frame: &mut Frame<'_>, area: Rect, score: u32) {
    let score = format!("Score: {score}");

    render_popup(frame, area, VICTORY_TITLE, Color::Green, &[score.as_str()]);
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, color: Color, body: &[&str]) {
    let popup = centered_popup(area, title, body);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::styled(
            title.to_owned(),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    lines.extend(body.iter().map(|text| Line::from(text.to_string())));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

/// Sizes the popup to its widest line plus border and padding, clamped to `area`.
fn centered_popup(area: Rect, title: &str, body: &[&str]) -> Rect {
    let widest = body
        .iter()
        .map(|line| line.width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or_default();
    let width = u16::try_from(widest + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(body.len() + 4).unwrap_or(u16::MAX);

    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
