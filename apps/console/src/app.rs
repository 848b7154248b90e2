//! Terminal session: raw mode, alternate screen and the key event loop.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use session_core::{DispatchEngine, DispatchOutcome};
use shared::protocol::ControlEvent;
use tracing::{debug, info};

use crate::{
    controller::{InputLine, Keymap},
    ui,
};

/// Restores the terminal when dropped, including on early returns.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let setup = || -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        };
        match setup() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = disable_raw_mode();
                Err(error)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Runs until the user quits or the terminal goes away. Submissions are
/// awaited inline, so keys pressed meanwhile queue up behind them.
pub async fn run(engine: &mut DispatchEngine, scroll_step: u16) -> Result<()> {
    let mut terminal = TerminalGuard::enter().context("failed to set up terminal")?;
    let keymap = Keymap::new(scroll_step);
    let mut input = InputLine::default();
    let mut events = EventStream::new();

    loop {
        draw(&mut terminal, engine, &input, false)?;

        let Some(event) = events.next().await else {
            info!("console: terminal event stream closed");
            break;
        };
        let Event::Key(key) = event.context("failed to read terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(control) = keymap.map(key, &mut input) else {
            continue;
        };

        if matches!(control, ControlEvent::Submit(_)) {
            draw(&mut terminal, engine, &input, true)?;
        }
        let event_name = control.name();
        match engine.handle(control).await? {
            DispatchOutcome::Quit => {
                info!("console: quit requested");
                break;
            }
            outcome => debug!(event = event_name, ?outcome, "console: event handled"),
        }
    }
    Ok(())
}

fn draw(
    guard: &mut TerminalGuard,
    engine: &mut DispatchEngine,
    input: &InputLine,
    busy: bool,
) -> Result<()> {
    let mut max_scroll = 0;
    guard
        .terminal
        .draw(|frame| max_scroll = ui::render(frame, &*engine, input, busy))
        .context("failed to draw frame")?;
    engine.clamp_scroll(max_scroll);
    Ok(())
}
