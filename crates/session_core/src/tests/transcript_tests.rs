use super::*;

#[test]
fn appends_preserve_order_per_transcript() {
    let mut store = TranscriptStore::new(2);
    store
        .append(ConnectionId(0), Entry::command("p ", "ls", "a\n"))
        .expect("append");
    store
        .append(ConnectionId(0), Entry::command("p ", "pwd", "/\n"))
        .expect("append");
    let len = store
        .append(ConnectionId(1), Entry::status("hello"))
        .expect("append");

    assert_eq!(len, 1);
    let first = store.get(ConnectionId(0)).expect("transcript");
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].command, "ls");
    assert_eq!(first[1].command, "pwd");
    assert_eq!(store.entry_count(ConnectionId(1)), 1);
}

#[test]
fn out_of_range_access_is_an_error() {
    let mut store = TranscriptStore::new(1);
    assert_eq!(
        store.append(ConnectionId(1), Entry::status("x")),
        Err(SessionError::UnknownConnection(ConnectionId(1)))
    );
    assert!(store.get(ConnectionId(5)).is_err());
    assert_eq!(store.entry_count(ConnectionId(5)), 0);
}

#[test]
fn command_entry_renders_prompt_then_output() {
    let entry = Entry::command("ops@web ~ % ", "whoami", "ops\n");
    assert_eq!(entry.render(), "ops@web ~ % whoami\nops\n");
    assert!(!entry.is_status());
}

#[test]
fn status_entry_renders_message_only() {
    let entry = Entry::status("switching synchronization to: false");
    assert_eq!(entry.render(), "switching synchronization to: false");
    assert!(entry.is_status());
    assert!(entry.prefix.is_empty());
}
