use pretty_assertions::assert_eq;

use ghostwriter::sink::{BufferSink, InputSink, Key};

fn typed(text: &str) -> BufferSink {
    let mut sink = BufferSink::new();
    for c in text.chars() {
        sink.insert_char(c).unwrap();
    }
    sink
}

#[test]
fn inserts_append_at_the_cursor() {
    let sink = typed("hello");
    assert_eq!(sink.text(), "hello");
    assert_eq!(sink.cursor(), 5);
}

#[test]
fn backspace_removes_before_the_cursor() {
    let mut sink = typed("hello");
    sink.press_key(Key::Backspace).unwrap();
    assert_eq!(sink.text(), "hell");

    // At the start of the buffer it is a no-op.
    let mut sink = BufferSink::new();
    sink.press_key(Key::Backspace).unwrap();
    assert_eq!(sink.text(), "");
}

#[test]
fn selection_extends_and_deletes() {
    let mut sink = typed("one two three");

    // Walk back to the start of "two" and select it.
    for _ in 0..9 {
        sink.press_key(Key::Left).unwrap();
    }
    for _ in 0..3 {
        sink.key_combo(&[Key::Shift, Key::Right]).unwrap();
    }
    sink.press_key(Key::Delete).unwrap();
    assert_eq!(sink.text(), "one  three");

    for c in "2".chars() {
        sink.insert_char(c).unwrap();
    }
    assert_eq!(sink.text(), "one 2 three");
}

#[test]
fn ctrl_end_returns_to_the_document_end() {
    let mut sink = typed("abcdef");
    for _ in 0..4 {
        sink.press_key(Key::Left).unwrap();
    }
    assert_eq!(sink.cursor(), 2);

    sink.press_key(Key::End).unwrap();
    sink.key_combo(&[Key::Ctrl, Key::End]).unwrap();
    assert_eq!(sink.cursor(), 6);
}

#[test]
fn insert_replaces_an_active_selection() {
    let mut sink = typed("abc");
    sink.press_key(Key::Home).unwrap();
    sink.key_combo(&[Key::Shift, Key::Right]).unwrap();
    sink.key_combo(&[Key::Shift, Key::Right]).unwrap();
    sink.insert_char('X').unwrap();
    assert_eq!(sink.text(), "Xc");
}

#[test]
fn unknown_combos_are_an_error() {
    let mut sink = typed("abc");
    assert!(sink.key_combo(&[Key::Ctrl, Key::Backspace]).is_err());
}

#[test]
fn plain_movement_collapses_the_selection() {
    let mut sink = typed("abcd");
    sink.press_key(Key::Home).unwrap();
    sink.key_combo(&[Key::Shift, Key::Right]).unwrap();
    sink.press_key(Key::Right).unwrap();
    // Moving without shift drops the anchor; delete removes one char only.
    sink.press_key(Key::Delete).unwrap();
    assert_eq!(sink.text(), "abd");
}
