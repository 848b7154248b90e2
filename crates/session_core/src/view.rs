use shared::domain::{ConnectionId, DispatchMode};

/// Next view index in cycling order: forward only, wrapping from `max` to 0.
pub fn cycle(current: usize, max: usize) -> usize {
    if current < max {
        current + 1
    } else {
        0
    }
}

/// Which transcript is on screen, how submissions fan out, and scroll state.
///
/// `current` always names a valid transcript. Entering help remembers it so
/// leaving help lands back on the same connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    current: ConnectionId,
    connection_count: usize,
    sync_enabled: bool,
    help_return: Option<ConnectionId>,
    autoscroll: bool,
    scroll_from_bottom: u16,
}

impl ViewState {
    /// Built by `Session::new`, which rejects an empty pool.
    pub(crate) fn new(connection_count: usize) -> Self {
        Self {
            current: ConnectionId(0),
            connection_count,
            sync_enabled: true,
            help_return: None,
            autoscroll: true,
            scroll_from_bottom: 0,
        }
    }

    pub fn current(&self) -> ConnectionId {
        self.current
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn mode(&self) -> DispatchMode {
        DispatchMode::from_sync(self.sync_enabled)
    }

    pub fn help_active(&self) -> bool {
        self.help_return.is_some()
    }

    pub fn autoscroll(&self) -> bool {
        self.autoscroll
    }

    /// Lines scrolled up from the bottom of the transcript. The renderer
    /// clamps this to the content height.
    pub fn scroll_from_bottom(&self) -> u16 {
        if self.autoscroll {
            0
        } else {
            self.scroll_from_bottom
        }
    }

    /// Advances to the next connection, or leaves help without advancing.
    pub fn cycle_next(&mut self) -> ConnectionId {
        if self.leave_help() {
            return self.current;
        }
        self.current = ConnectionId(cycle(self.current.0, self.connection_count.saturating_sub(1)));
        self.current
    }

    pub fn enter_help(&mut self) {
        if self.help_return.is_none() {
            self.help_return = Some(self.current);
        }
    }

    /// Returns whether help was active.
    pub fn leave_help(&mut self) -> bool {
        match self.help_return.take() {
            Some(saved) => {
                self.current = saved;
                true
            }
            None => false,
        }
    }

    /// Flips the dispatch mode and returns the new value.
    pub fn toggle_sync(&mut self) -> bool {
        self.sync_enabled = !self.sync_enabled;
        self.sync_enabled
    }

    pub fn scroll_to_top(&mut self) {
        self.autoscroll = false;
        self.scroll_from_bottom = u16::MAX;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.autoscroll = true;
        self.scroll_from_bottom = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let from = self.scroll_from_bottom();
        self.autoscroll = false;
        self.scroll_from_bottom = from.saturating_add(lines);
    }

    /// Bounds the offset to what the rendered content can actually show.
    pub fn clamp_scroll(&mut self, max_from_bottom: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_from_bottom);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let from = self.scroll_from_bottom();
        self.autoscroll = false;
        self.scroll_from_bottom = from.saturating_sub(lines);
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
