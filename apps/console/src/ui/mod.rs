//! Frame rendering: transcript pane on top, command line below.

mod wrap;

use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use session_core::{engine::BUSY_NOTICE, CurrentView, DispatchEngine, EntryKind};

use crate::controller::InputLine;

pub use wrap::wrap_text;

/// Draws one frame and returns the largest usable scroll offset, counted
/// in lines up from the bottom of the transcript.
pub fn render(frame: &mut Frame, engine: &DispatchEngine, input: &InputLine, busy: bool) -> u16 {
    let [body, prompt] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(frame.area());

    let inner_width = usize::from(body.width.saturating_sub(2));
    let inner_height = body.height.saturating_sub(2);
    let lines = transcript_lines(&engine.current_view(), inner_width);

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_from_bottom = total.saturating_sub(inner_height);
    let from_bottom = engine.view_state().scroll_from_bottom().min(max_from_bottom);

    let title = Line::styled(
        format!(" {} ", engine.status_line(busy)),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((max_from_bottom - from_bottom, 0));
    frame.render_widget(transcript, body);

    let prompt_text = if busy { BUSY_NOTICE } else { input.text() };
    let prompt_style = if busy {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(prompt_text)
            .style(prompt_style)
            .block(Block::default().borders(Borders::ALL)),
        prompt,
    );
    if !busy {
        let column = u16::try_from(input.cursor()).unwrap_or(u16::MAX);
        let max_column = prompt.width.saturating_sub(2);
        frame.set_cursor_position((prompt.x + 1 + column.min(max_column), prompt.y + 1));
    }

    max_from_bottom
}

/// Wrapped display lines for the active view. Each transcript entry is
/// followed by a blank spacer line.
pub fn transcript_lines(view: &CurrentView<'_>, width: usize) -> Vec<Line<'static>> {
    match view {
        CurrentView::Help(text) => wrap_text(text, width).into_iter().map(Line::from).collect(),
        CurrentView::Transcript { entries, .. } => {
            let mut lines = Vec::new();
            for entry in entries.iter() {
                let style = match entry.kind {
                    EntryKind::Status => Style::default().fg(Color::Yellow),
                    EntryKind::Command => Style::default(),
                };
                lines.extend(
                    wrap_text(&entry.render(), width)
                        .into_iter()
                        .map(|row| Line::styled(row, style)),
                );
                lines.push(Line::default());
            }
            lines
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
