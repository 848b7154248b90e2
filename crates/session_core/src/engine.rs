use shared::{domain::ConnectionId, protocol::ControlEvent};
use tracing::{debug, info, warn};

use crate::{
    error::SessionError,
    resolver::{Command, CommandResolver},
    session::Session,
    transcript::Entry,
    view::ViewState,
};

/// Submission that opens the help view instead of being dispatched.
pub const HELP_COMMAND: &str = "help";

/// Shown in the input line while a submission is in flight.
pub const BUSY_NOTICE: &str = "Commands Running, please wait";

pub const HELP_TEXT: &str = "Use tab to cycle between connection views
Use 'loadCommand(<filename>)' to load a command from a file
Use Ctrl+s to toggle sync (commands running on all or only current terminal)
Use Ctrl+t to quick scroll to the top
Use Ctrl+b to quick scroll to the bottom
Use up and down arrow keys to scroll
Use Esc to quit and disconnect
Press tab to exit help view";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Resolving,
    Dispatching,
    Recording,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command ran on `targets` and each got one new entry.
    Recorded { targets: Vec<ConnectionId> },
    /// A `loadCommand(...)` submission could not be resolved; nothing ran.
    LoadFailed { reason: String },
    HelpShown,
    SyncToggled { sync_enabled: bool },
    ViewChanged { current: ConnectionId },
    Scrolled,
    Quit,
}

pub enum CurrentView<'a> {
    Help(&'static str),
    Transcript {
        id: ConnectionId,
        prefix: &'a str,
        entries: &'a [Entry],
    },
}

/// Drives one submission at a time through resolve, dispatch and record.
///
/// Every mutating entry point takes `&mut self`, so a caller cannot start a
/// new submission until the previous one has been recorded.
pub struct DispatchEngine {
    session: Session,
    resolver: CommandResolver,
    phase: DispatchPhase,
}

impl DispatchEngine {
    pub fn new(session: Session, resolver: CommandResolver) -> Self {
        Self {
            session,
            resolver,
            phase: DispatchPhase::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view_state(&self) -> &ViewState {
        self.session.view()
    }

    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    pub async fn handle(&mut self, event: ControlEvent) -> Result<DispatchOutcome, SessionError> {
        debug!(event = event.name(), "engine: handling control event");
        match event {
            ControlEvent::Submit(raw) => self.submit(&raw).await,
            ControlEvent::CycleNext => {
                let current = self.session.view_mut().cycle_next();
                Ok(DispatchOutcome::ViewChanged { current })
            }
            ControlEvent::ToggleSync => self.toggle_sync(),
            ControlEvent::ScrollToTop => {
                self.session.view_mut().scroll_to_top();
                Ok(DispatchOutcome::Scrolled)
            }
            ControlEvent::ScrollToBottom => {
                self.session.view_mut().scroll_to_bottom();
                Ok(DispatchOutcome::Scrolled)
            }
            ControlEvent::ScrollUp(lines) => {
                self.session.view_mut().scroll_up(lines);
                Ok(DispatchOutcome::Scrolled)
            }
            ControlEvent::ScrollDown(lines) => {
                self.session.view_mut().scroll_down(lines);
                Ok(DispatchOutcome::Scrolled)
            }
            ControlEvent::Quit => {
                self.shutdown().await;
                Ok(DispatchOutcome::Quit)
            }
        }
    }

    pub async fn submit(&mut self, raw: &str) -> Result<DispatchOutcome, SessionError> {
        if self.session.pool().is_closed() {
            return Err(SessionError::PoolClosed);
        }
        self.session.view_mut().leave_help();

        self.transition(DispatchPhase::Resolving);
        let command = match self.resolver.resolve(raw).await {
            Ok(command) => command,
            Err(error) => {
                warn!(code = ?error.code(), %error, "engine: command load failed");
                let current = self.session.view().current();
                let notice = Entry::status(format!(
                    "Error loading file name, please try again: {error}"
                ));
                let appended = self.session.parts_mut().1.append(current, notice);
                self.transition(DispatchPhase::Idle);
                appended?;
                return Ok(DispatchOutcome::LoadFailed {
                    reason: error.to_string(),
                });
            }
        };

        if command.resolved == HELP_COMMAND {
            self.session.view_mut().enter_help();
            self.transition(DispatchPhase::Idle);
            return Ok(DispatchOutcome::HelpShown);
        }

        self.transition(DispatchPhase::Dispatching);
        let outcome = self.dispatch(&command).await;
        self.transition(DispatchPhase::Idle);
        outcome
    }

    async fn dispatch(&mut self, command: &Command) -> Result<DispatchOutcome, SessionError> {
        let sync_enabled = self.session.view().sync_enabled();
        let current = self.session.view().current();
        let pool = self.session.pool();

        let (targets, outputs) = if sync_enabled {
            let outputs = pool.execute_all(&command.resolved).await?;
            (pool.ids().collect::<Vec<_>>(), outputs)
        } else {
            let output = pool.execute(current, &command.resolved).await?;
            (vec![current], vec![output])
        };

        self.transition(DispatchPhase::Recording);
        let (pool, transcripts, _) = self.session.parts_mut();
        for (&id, output) in targets.iter().zip(outputs) {
            let prefix = pool.prefix(id)?;
            transcripts.append(id, Entry::command(prefix, command.resolved.clone(), output))?;
        }
        info!(
            targets = targets.len(),
            sync_enabled,
            from_file = command.is_file_indirection(),
            "engine: command recorded"
        );

        Ok(DispatchOutcome::Recorded { targets })
    }

    /// Flips broadcast mode and notes the change in the displayed transcript only.
    pub fn toggle_sync(&mut self) -> Result<DispatchOutcome, SessionError> {
        let (_, transcripts, view) = self.session.parts_mut();
        view.leave_help();
        let sync_enabled = view.toggle_sync();
        transcripts.append(
            view.current(),
            Entry::status(format!("switching synchronization to: {sync_enabled}")),
        )?;
        info!(sync_enabled, "engine: synchronization toggled");
        Ok(DispatchOutcome::SyncToggled { sync_enabled })
    }

    pub fn clamp_scroll(&mut self, max_from_bottom: u16) {
        self.session.view_mut().clamp_scroll(max_from_bottom);
    }

    /// Closes every connection. Safe to call more than once.
    pub async fn shutdown(&mut self) {
        self.session.pool_mut().close_all().await;
    }

    pub fn current_view(&self) -> CurrentView<'_> {
        let view = self.session.view();
        if view.help_active() {
            return CurrentView::Help(HELP_TEXT);
        }
        let id = view.current();
        CurrentView::Transcript {
            id,
            prefix: self.session.pool().prefix(id).unwrap_or_default(),
            entries: self.session.transcripts().get(id).unwrap_or_default(),
        }
    }

    /// `busy` marks a submission the caller is still awaiting.
    pub fn status_line(&self, busy: bool) -> String {
        let view = self.session.view();
        let location = if view.help_active() {
            "help".to_string()
        } else {
            format!(
                "server {}/{}",
                view.current().ordinal(),
                self.session.pool().size()
            )
        };
        let mut line = format!("{location} | sync: {}", view.mode().label());
        if busy {
            line.push_str(" | running");
        }
        line
    }

    fn transition(&mut self, next: DispatchPhase) {
        debug!(from = ?self.phase, to = ?next, "engine: phase transition");
        self.phase = next;
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
