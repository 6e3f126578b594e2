// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Whole reads driven end to end: events in, a [`LineRead`] and terminal output out.

use crossterm::event::{KeyCode, KeyModifiers};
use pretty_assertions::assert_eq;
use r3bl_line_editor::{CrosstermEventSource, Editor, EditorSignal, EventSenders,
                       HistoryStore, InMemoryHistory, InputDevice, InputDeviceExtMock,
                       LineEditorError, LineRead, MockTerminalDevice, Mode,
                       ModifierKeysMask, OutputDevice, OutputDeviceExt, PathLookup,
                       ScriptValue, SignalHub, SpecialKey, StdoutMock, TerminalAttributes,
                       gen_key_event, gen_typed_text_events, keypress,
                       try_create_temp_dir};
use std::{sync::Arc, time::Duration};

const SETTLE: Duration = Duration::from_millis(100);

fn channel_editor(
    device: Arc<MockTerminalDevice>,
) -> (Editor, EventSenders, Arc<InMemoryHistory>, StdoutMock) {
    let (output_device, stdout_mock) = OutputDevice::new_mock();
    let history = Arc::new(InMemoryHistory::default());
    let (editor, senders) = Editor::new_with_channels(device, output_device);
    let editor = editor
        .with_history(history.clone())
        .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])))
        .with_prompt(|| "$ ".to_string());
    (editor, senders, history, stdout_mock)
}

async fn send_text(senders: &EventSenders, text: &str) {
    for ch in text.chars() {
        senders.keys.send(keypress!(@char ch)).await.unwrap();
    }
}

async fn send_enter(senders: &EventSenders) {
    senders
        .keys
        .send(keypress!(@special SpecialKey::Enter))
        .await
        .unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_crossterm_events_to_line() {
    let device = Arc::new(MockTerminalDevice::new(40));
    let (output_device, stdout_mock) = OutputDevice::new_mock();
    let mut events = gen_typed_text_events("echo hi");
    events.push(gen_key_event(KeyCode::Left, KeyModifiers::NONE));
    events.push(gen_key_event(KeyCode::Char('!'), KeyModifiers::NONE));
    events.push(gen_key_event(KeyCode::Enter, KeyModifiers::NONE));
    let event_source = CrosstermEventSource::new(InputDevice::new_mock(events));
    let history = Arc::new(InMemoryHistory::default());
    let mut editor = Editor::new(device.clone(), output_device, Box::new(event_source))
        .with_history(history.clone())
        .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])));

    let result = editor.read_line().await;

    assert!(matches!(&result, LineRead::Line(line) if line == "echo h!i"));
    assert_eq!(history.all_commands()[0].text, "echo h!i");
    assert_eq!(device.current_attributes(), TerminalAttributes::cooked());
    assert!(
        stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .contains("> echo h!i")
    );
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_interrupt_starts_the_line_over() {
    let device = Arc::new(MockTerminalDevice::new(40));
    let (editor, senders, history, _) = channel_editor(device.clone());
    let signals = SignalHub::new();
    let mut editor = editor.with_signals(signals.clone());
    let hub = signals.clone();
    editor
        .module()
        .binding(Mode::Insert)
        .set(
            &ScriptValue::Str("Ctrl-C".into()),
            ScriptValue::callable("raise-interrupt", move |_| {
                hub.send(EditorSignal::Interrupt);
                Ok(())
            }),
        )
        .unwrap();

    let feeder = tokio::spawn(async move {
        send_text(&senders, "rm -rf").await;
        senders
            .keys
            .send(keypress!(@char ModifierKeysMask::new().with_ctrl(), 'c'))
            .await
            .unwrap();
        tokio::time::sleep(SETTLE).await;
        send_text(&senders, "ls").await;
        send_enter(&senders).await;
        senders
    });

    let result = editor.read_line().await;
    let _senders = feeder.await.unwrap();

    assert!(matches!(&result, LineRead::Line(line) if line == "ls"));
    assert_eq!(history.all_commands().len(), 1);
    assert_eq!(device.current_attributes(), TerminalAttributes::cooked());
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_reader_errors_mouse_and_unknown_signals_do_not_end_the_read() {
    let device = Arc::new(MockTerminalDevice::new(60));
    let (editor, senders, _, stdout_mock) = channel_editor(device);
    let signals = SignalHub::new();
    let mut editor = editor.with_signals(signals.clone());

    let feeder = tokio::spawn(async move {
        tokio::time::sleep(SETTLE).await;
        senders
            .errors
            .send(std::io::Error::other("tty hiccup"))
            .await
            .unwrap();
        tokio::time::sleep(SETTLE).await;
        signals.send(EditorSignal::Other(10));
        tokio::time::sleep(SETTLE).await;
        senders.cursor_positions.send((3, 4)).await.unwrap();
        tokio::time::sleep(SETTLE).await;
        send_text(&senders, "ok").await;
        send_enter(&senders).await;
        senders
    });

    let result = editor.read_line().await;
    let _senders = feeder.await.unwrap();

    assert!(matches!(&result, LineRead::Line(line) if line == "ok"));
    let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
    assert!(output.contains("reader error: tty hiccup"));
    assert!(output.contains("ignored signal 10"));
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_history_persists_across_reads_and_can_be_walked() {
    let device = Arc::new(MockTerminalDevice::new(60));
    let (mut editor, senders, history, _) = channel_editor(device);

    for line in ["make build", "make test"] {
        send_text(&senders, line).await;
        send_enter(&senders).await;
        assert!(matches!(editor.read_line().await, LineRead::Line(_)));
    }

    // Walk back to the older match of the "make" prefix, then accept it.
    send_text(&senders, "make").await;
    let up = keypress!(@special SpecialKey::Up);
    senders.keys.send(up).await.unwrap();
    senders.keys.send(up).await.unwrap();
    send_enter(&senders).await;
    let result = editor.read_line().await;

    assert!(matches!(&result, LineRead::Line(line) if line == "make build"));
    let texts: Vec<_> = history.all_commands().into_iter().map(|it| it.text).collect();
    assert_eq!(texts, vec!["make build", "make test", "make build"]);
}

#[cfg(unix)]
#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_external_commands_arrive_during_the_read() {
    use std::os::unix::fs::PermissionsExt;

    let dir = try_create_temp_dir().unwrap();
    let tool = dir.join("frobnicate");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let device = Arc::new(MockTerminalDevice::new(40));
    let (editor, senders, _, _) = channel_editor(device);
    let mut editor =
        editor.with_external_lookup(Arc::new(PathLookup::with_dirs(vec![dir.inner.clone()])));

    let feeder = tokio::spawn(async move {
        tokio::time::sleep(SETTLE).await;
        send_text(&senders, "frobnicate").await;
        send_enter(&senders).await;
        senders
    });

    assert!(matches!(editor.read_line().await, LineRead::Line(_)));
    let _senders = feeder.await.unwrap();
    assert!(editor.state().is_external.contains("frobnicate"));
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_ended_input_stream_is_an_error_and_restores_terminal() {
    let device = Arc::new(MockTerminalDevice::new(40));
    let (output_device, _stdout_mock) = OutputDevice::new_mock();
    let event_source =
        CrosstermEventSource::new(InputDevice::new_mock(gen_typed_text_events("abc")));
    let mut editor = Editor::new(device.clone(), output_device, Box::new(event_source))
        .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])));

    let result = editor.read_line().await;

    assert!(matches!(
        result,
        LineRead::Error(LineEditorError::EventSourcesClosed)
    ));
    assert_eq!(editor.state().buffer, "abc");
    assert_eq!(device.current_attributes(), TerminalAttributes::cooked());
}
