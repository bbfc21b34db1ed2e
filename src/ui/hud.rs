use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::Snapshot;

const HUD_MARGIN_X: u16 = 1;
const CONTROLS_HINT: &str = "arrows/WASD move · R restart · Q quit";

/// Draws the score row above and the controls row below, returning the space between.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) -> Rect {
    let [score_area, play_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(score_line(snapshot.score, snapshot.segments.len())),
        inset_horizontal(score_area, HUD_MARGIN_X),
    );
    frame.render_widget(
        Paragraph::new(CONTROLS_HINT)
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::DarkGray)),
        hint_area,
    );

    play_area
}

fn score_line(score: u32, length: usize) -> Line<'static> {
    let value = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(score.to_string(), value),
        Span::raw("   Length: "),
        Span::styled(length.to_string(), value),
    ])
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(margin.saturating_mul(2)),
        height: area.height,
    }
}
