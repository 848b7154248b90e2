//! Maps terminal key presses onto [`ControlEvent`]s.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shared::protocol::ControlEvent;

/// The command line being typed at the bottom of the screen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    text: String,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor column, in characters from the start of the line.
    pub fn cursor(&self) -> usize {
        self.text.chars().count()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    scroll_step: u16,
}

impl Keymap {
    pub fn new(scroll_step: u16) -> Self {
        Self {
            scroll_step: scroll_step.max(1),
        }
    }

    /// Editing keys change `input` and yield nothing. Enter on a blank line
    /// is ignored.
    pub fn map(&self, key: KeyEvent, input: &mut InputLine) -> Option<ControlEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(ControlEvent::Quit),
            KeyCode::Char('s') if ctrl => Some(ControlEvent::ToggleSync),
            KeyCode::Char('t') if ctrl => Some(ControlEvent::ScrollToTop),
            KeyCode::Char('b') if ctrl => Some(ControlEvent::ScrollToBottom),
            KeyCode::Esc => Some(ControlEvent::Quit),
            KeyCode::Tab => Some(ControlEvent::CycleNext),
            KeyCode::Up => Some(ControlEvent::ScrollUp(self.scroll_step)),
            KeyCode::Down => Some(ControlEvent::ScrollDown(self.scroll_step)),
            KeyCode::Enter if input.is_blank() => None,
            KeyCode::Enter => Some(ControlEvent::Submit(input.take())),
            KeyCode::Backspace => {
                input.backspace();
                None
            }
            KeyCode::Char(ch) if !ctrl => {
                input.push(ch);
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/keymap_tests.rs"]
mod tests;
