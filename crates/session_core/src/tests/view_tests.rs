use super::*;

#[test]
fn cycle_advances_then_wraps_to_zero() {
    let max = 3;
    for v in 0..max {
        assert_eq!(cycle(v, max), v + 1);
    }
    assert_eq!(cycle(max, max), 0);
    assert_eq!(cycle(0, 0), 0);
}

#[test]
fn cycle_next_walks_every_connection() {
    let mut view = ViewState::new(3);
    let visited: Vec<_> = (0..4).map(|_| view.cycle_next().0).collect();
    assert_eq!(visited, vec![1, 2, 0, 1]);
}

#[test]
fn cycle_next_without_connections_stays_at_zero() {
    let mut view = ViewState::new(0);
    assert_eq!(view.cycle_next(), ConnectionId(0));
    assert_eq!(view.cycle_next(), ConnectionId(0));
}

#[test]
fn help_restores_the_previous_connection() {
    let mut view = ViewState::new(3);
    view.cycle_next();
    view.cycle_next();

    view.enter_help();
    assert!(view.help_active());

    assert_eq!(view.cycle_next(), ConnectionId(2));
    assert!(!view.help_active());
}

#[test]
fn help_on_first_connection_keeps_index_valid() {
    let mut view = ViewState::new(2);
    view.enter_help();
    view.enter_help();
    assert!(view.leave_help());
    assert_eq!(view.current(), ConnectionId(0));
    assert!(!view.leave_help());
}

#[test]
fn toggling_twice_restores_mode() {
    let mut view = ViewState::new(1);
    assert!(view.sync_enabled());
    assert!(!view.toggle_sync());
    assert_eq!(view.mode(), DispatchMode::Targeted);
    assert!(view.toggle_sync());
    assert_eq!(view.mode(), DispatchMode::Broadcast);
}

#[test]
fn scrolling_disables_autoscroll_until_bottom() {
    let mut view = ViewState::new(1);
    assert!(view.autoscroll());

    view.scroll_up(5);
    assert!(!view.autoscroll());
    assert_eq!(view.scroll_from_bottom(), 5);

    view.scroll_down(2);
    assert_eq!(view.scroll_from_bottom(), 3);
    view.scroll_down(10);
    assert_eq!(view.scroll_from_bottom(), 0);
    assert!(!view.autoscroll());

    view.scroll_to_bottom();
    assert!(view.autoscroll());
}

#[test]
fn scroll_to_top_is_clamped_by_content() {
    let mut view = ViewState::new(1);
    view.scroll_to_top();
    view.clamp_scroll(40);
    assert_eq!(view.scroll_from_bottom(), 40);

    view.scroll_down(5);
    assert_eq!(view.scroll_from_bottom(), 35);
}
