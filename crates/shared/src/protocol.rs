/// Discrete input the control loop feeds into the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Submit(String),
    CycleNext,
    ToggleSync,
    ScrollToTop,
    ScrollToBottom,
    ScrollUp(u16),
    ScrollDown(u16),
    Quit,
}

impl ControlEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControlEvent::Submit(_) => "submit",
            ControlEvent::CycleNext => "cycle_next",
            ControlEvent::ToggleSync => "toggle_sync",
            ControlEvent::ScrollToTop => "scroll_to_top",
            ControlEvent::ScrollToBottom => "scroll_to_bottom",
            ControlEvent::ScrollUp(_) => "scroll_up",
            ControlEvent::ScrollDown(_) => "scroll_down",
            ControlEvent::Quit => "quit",
        }
    }
}
