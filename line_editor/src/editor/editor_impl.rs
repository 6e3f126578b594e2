// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt termios

use crate::{Binding, BindingTables, BuiltinError, ChannelEventSource, Completer,
            DefaultCompleter, EditContext, EditorModule, EditorSignal, EditorState,
            EventSource, InMemoryHistory, KeyLookup, KeyPress, LineEditorError, LineRead,
            LiveAnalyzer, ModeState, NextAction, OutputDevice, PathLookup, Renderer,
            SafeBindingTables, SafeExternalCommandLookup, SafeHistoryStore,
            SafeTerminalDevice, ScriptValue, SignalHub, TerminalRenderer, TerminalSession,
            UNKNOWN_HISTORY_SEQ, lock_or_panic, spawn_lookup};
use crossterm::event::MouseEvent;
use std::{collections::HashSet, sync::Arc};
use tokio::sync::{broadcast, oneshot};

/// Produces the left or right prompt. Called once per loop iteration.
pub type PromptProducer = Arc<dyn Fn() -> String + Send + Sync>;

/// Reads one line at a time from a terminal.
///
/// Every [`Self::read_line`] call owns the terminal from start to finish: raw mode is
/// entered, the event source is started, and a single loop renders, waits for the next
/// event and dispatches keys until a binding ends the read. The terminal attributes are
/// put back on every way out, including when the future is dropped.
///
/// The binding tables are shared. Get at them with [`Self::module`], or hand the same
/// tables to several editors with [`Self::with_bindings`].
pub struct Editor {
    state: EditorState,
    device: SafeTerminalDevice,
    output_device: OutputDevice,
    event_source: Box<dyn EventSource>,
    renderer: Box<dyn Renderer>,
    analyzer: LiveAnalyzer,
    bindings: SafeBindingTables,
    history: SafeHistoryStore,
    completer: Arc<dyn Completer>,
    external_lookup: SafeExternalCommandLookup,
    signals: SignalHub,
    /// Forwards OS signals to [`Self::signals`], aborted on drop.
    signal_listener: Option<tokio::task::JoinHandle<()>>,
    prompt: PromptProducer,
    rprompt: PromptProducer,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("device", &self.device)
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}

/// One event taken off the channels the read loop waits on.
#[derive(Debug)]
enum LoopEvent {
    /// [None] when the lookup failed.
    ExternalCommands(Option<HashSet<String>>),
    Signal(EditorSignal),
    ReaderError(std::io::Error),
    Mouse(MouseEvent),
    CursorPosition((u16, u16)),
    /// [None] when the key channel is closed.
    Key(Option<KeyPress>),
}

/// Resolves once, with the names or [None]. Never resolves if there is no lookup.
async fn recv_external_commands(
    receiver: &mut Option<oneshot::Receiver<HashSet<String>>>,
) -> Option<HashSet<String>> {
    match receiver {
        Some(it) => it.await.ok(),
        None => std::future::pending().await,
    }
}

impl Editor {
    /// An editor for `device` rendering to `output_device`, with in memory history, the
    /// default bindings, analyzer, completer and renderer, and `> ` as its prompt.
    #[must_use]
    pub fn new(
        device: SafeTerminalDevice,
        output_device: OutputDevice,
        event_source: Box<dyn EventSource>,
    ) -> Self {
        Self {
            state: EditorState::default(),
            renderer: Box::new(TerminalRenderer::new(device.clone())),
            device,
            output_device,
            event_source,
            analyzer: LiveAnalyzer::default(),
            bindings: BindingTables::with_defaults().into_shared(),
            history: Arc::new(InMemoryHistory::default()),
            completer: Arc::new(DefaultCompleter::default()),
            external_lookup: Arc::new(PathLookup::default()),
            signals: SignalHub::default(),
            signal_listener: None,
            prompt: Arc::new(|| "> ".to_string()),
            rprompt: Arc::new(String::new),
        }
    }

    /// The controlling terminal, with the settings in `config`. OS signals are forwarded
    /// to the editor from now on.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file can't be opened or signal handlers can't be
    /// installed.
    #[cfg(unix)]
    pub fn try_from_config(config: &crate::EditorConfig) -> miette::Result<Self> {
        let history: SafeHistoryStore = match &config.history_file {
            Some(path) => Arc::new(crate::FileHistory::try_open(
                path.clone(),
                config.history_max_size,
            )?),
            None => Arc::new(InMemoryHistory::new(config.history_max_size)),
        };
        let event_source = Box::new(crate::CrosstermEventSource::new(
            crate::InputDevice::new_event_stream(),
        ));
        let prompt = config.prompt.clone();
        let rprompt = config.rprompt.clone();

        let mut it = Self::new(
            Arc::new(crate::TtyDevice),
            OutputDevice::new_stdout(),
            event_source,
        )
        .with_history(history)
        .with_analyzer(LiveAnalyzer::default().with_policy(config.diagnostic_policy.into()))
        .with_prompt(move || prompt.clone())
        .with_rprompt(move || rprompt.clone());
        it.signal_listener = Some(it.signals.try_listen_to_os_signals()?);
        Ok(it)
    }

    /// [`Self::try_from_config`] with the config file at its default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is malformed, or see
    /// [`Self::try_from_config`].
    #[cfg(unix)]
    pub fn try_new_for_terminal() -> miette::Result<Self> {
        let config = match crate::EditorConfig::default_path() {
            Some(path) => crate::EditorConfig::try_load(&path)?,
            None => crate::EditorConfig::default(),
        };
        Self::try_from_config(&config)
    }

    /// An editor fed by a [`ChannelEventSource`]. Returns the senders to push events
    /// with.
    #[must_use]
    pub fn new_with_channels(
        device: SafeTerminalDevice,
        output_device: OutputDevice,
    ) -> (Self, crate::EventSenders) {
        let (event_source, senders) = ChannelEventSource::new();
        (Self::new(device, output_device, Box::new(event_source)), senders)
    }

    #[must_use]
    pub fn with_history(mut self, history: SafeHistoryStore) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: LiveAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: SafeBindingTables) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = completer;
        self
    }

    #[must_use]
    pub fn with_external_lookup(mut self, lookup: SafeExternalCommandLookup) -> Self {
        self.external_lookup = lookup;
        self
    }

    #[must_use]
    pub fn with_signals(mut self, signals: SignalHub) -> Self {
        self.signals = signals;
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    #[must_use]
    pub fn with_rprompt(
        mut self,
        rprompt: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.rprompt = Arc::new(rprompt);
        self
    }

    /// The scripting surface over the binding tables this editor uses.
    #[must_use]
    pub fn module(&self) -> EditorModule { EditorModule::new(self.bindings.clone()) }

    #[must_use]
    pub fn history(&self) -> &SafeHistoryStore { &self.history }

    #[must_use]
    pub fn signals(&self) -> &SignalHub { &self.signals }

    /// State of the read in progress, or of the last one.
    #[must_use]
    pub fn state(&self) -> &EditorState { &self.state }

    /// Run a builtin by name against the state of the read in progress.
    ///
    /// # Errors
    ///
    /// See [`EditContext::call_builtin`]. Outside of a read this is always
    /// [`BuiltinError::EditorInactive`] (or an arity or name error).
    pub fn call_builtin(&mut self, name: &str, args: &[ScriptValue]) -> Result<(), BuiltinError> {
        let mut ctx = EditContext {
            state: &mut self.state,
            history: self.history.as_ref(),
            completer: self.completer.as_ref(),
        };
        ctx.call_builtin(name, args)
    }

    /// Read one line.
    ///
    /// Never returns a [`Result`]: failures come back as [`LineRead::Error`]. An error
    /// that happens while the terminal is being restored is combined with the one that
    /// ended the read, neither is dropped.
    ///
    /// # Panics
    ///
    /// If the output device or binding table lock is poisoned.
    pub async fn read_line(&mut self) -> LineRead {
        self.state = EditorState::new_active();

        let session = {
            let mut out = self.output_device.lock();
            TerminalSession::start(self.device.clone(), &mut *out)
        };
        let mut session = match session {
            Ok(it) => it,
            Err(err) => {
                tracing::error!(message = "can't start terminal session", ?err);
                self.state.active = false;
                return LineRead::Error(err.into());
            }
        };
        self.state.saved_termios = session.saved_attributes().cloned();

        self.state.history_seq = match self.history.next_sequence_number() {
            Ok(seq) => seq,
            Err(err) => {
                tracing::warn!(message = "can't get next history sequence number", ?err);
                UNKNOWN_HISTORY_SEQ
            }
        };

        let external = Some(spawn_lookup(self.external_lookup.clone()));
        let signals = self.signals.subscribe();
        self.renderer.reset();
        self.event_source.run();

        let result = self.main_loop(external, signals).await;
        self.finish(&mut session, result)
    }

    async fn main_loop(
        &mut self,
        mut external: Option<oneshot::Receiver<HashSet<String>>>,
        mut signals: broadcast::Receiver<EditorSignal>,
    ) -> LineRead {
        loop {
            self.state.prompt = (self.prompt)();
            self.state.rprompt = (self.rprompt)();
            if let Err(err) = self.analyze_and_render() {
                return LineRead::Error(err);
            }
            self.state.tips.clear();

            let channels = self.event_source.channels();
            let event = tokio::select! {
                // Poll for the external command names.
                // This branch is cancel safe because awaiting a `&mut` oneshot receiver
                // is cancel safe.
                names = recv_external_commands(&mut external), if external.is_some() => {
                    LoopEvent::ExternalCommands(names)
                }

                // Poll for OS signals.
                // This branch is cancel safe because recv is cancel safe.
                Ok(signal) = signals.recv() => LoopEvent::Signal(signal),

                // Poll the event source. All of these are cancel safe because recv is
                // cancel safe. A closed channel other than `keys` disables its branch.
                Some(err) = channels.errors.recv() => LoopEvent::ReaderError(err),
                Some(mouse) = channels.mouse.recv() => LoopEvent::Mouse(mouse),
                Some(position) = channels.cursor_positions.recv() => {
                    LoopEvent::CursorPosition(position)
                }
                maybe_key = channels.keys.recv() => LoopEvent::Key(maybe_key),
            };

            match event {
                LoopEvent::ExternalCommands(names) => {
                    external = None;
                    if let Some(names) = names {
                        tracing::debug!(message = "external commands", count = names.len());
                        self.state.is_external = names;
                    }
                }
                LoopEvent::Signal(signal) => self.handle_signal(signal),
                LoopEvent::ReaderError(err) => {
                    tracing::warn!(message = "reader error", ?err);
                    self.state.notify(format!("reader error: {err}"));
                }
                LoopEvent::Mouse(mouse) => self.state.add_tip(format!("mouse: {mouse:?}")),
                LoopEvent::CursorPosition((column, row)) => {
                    tracing::trace!(message = "cursor position report", column, row);
                }
                LoopEvent::Key(None) => {
                    tracing::warn!(message = "key channel closed");
                    return LineRead::Error(LineEditorError::EventSourcesClosed);
                }
                LoopEvent::Key(Some(key)) => {
                    if let Some(result) = self.dispatch_key(key) {
                        return result;
                    }
                }
            }
        }
    }

    fn handle_signal(&mut self, signal: EditorSignal) {
        tracing::debug!(message = "signal", %signal);
        match signal {
            EditorSignal::Interrupt => self.state.reset_for_interrupt(),
            // Every iteration renders anyway.
            EditorSignal::WindowChange | EditorSignal::Child => {}
            EditorSignal::Other(number) => {
                self.state.add_tip(format!("ignored signal {number}"));
            }
        }
    }

    /// Run bindings for `key` until one of them leaves something other than
    /// [`NextAction::ReprocessKey`]. Returns the result when the read is over.
    fn dispatch_key(&mut self, key: KeyPress) -> Option<LineRead> {
        loop {
            let mode = self.state.mode.mode();
            let lookup = lock_or_panic!(self.bindings).lookup(mode, key);
            let binding = match lookup {
                KeyLookup::NoTable => {
                    self.state.add_tip("No binding for current mode");
                    return None;
                }
                KeyLookup::Unbound => {
                    self.state
                        .add_tip(format!("Unbound and no default binding: {key}"));
                    return None;
                }
                KeyLookup::Found(binding) => binding,
            };

            self.state.last_key = Some(key);
            let mut ctx = EditContext {
                state: &mut self.state,
                history: self.history.as_ref(),
                completer: self.completer.as_ref(),
            };
            match &binding {
                Binding::Builtin(builtin) => (builtin.imp)(&mut ctx),
                Binding::User(callable) => {
                    if let Err(err) = callable.call(&mut ctx) {
                        tracing::warn!(message = "user function failed", ?err);
                        ctx.state.notify(format!("function error: {err}"));
                    }
                }
            }

            match self.state.take_next_action() {
                NextAction::NoAction => return None,
                NextAction::ReprocessKey => {
                    if let Err(err) = self.analyze_and_render() {
                        return Some(LineRead::Error(err));
                    }
                    self.state.tips.clear();
                }
                NextAction::ExitWithResult(result) => {
                    match &result {
                        LineRead::Line(line) if result.is_non_empty_line() => {
                            if let Err(err) = self.history.append(line) {
                                tracing::warn!(message = "can't append to history", ?err);
                            }
                        }
                        _ => {}
                    }
                    return Some(result);
                }
            }
        }
    }

    fn analyze_and_render(&mut self) -> Result<(), LineEditorError> {
        self.analyzer.analyze(&mut self.state, true);
        let full_redraw = std::mem::take(&mut self.state.force_full_redraw);
        let mut out = self.output_device.lock();
        self.renderer
            .render(&mut self.state, full_redraw, &mut *out)
            .map_err(LineEditorError::Render)
    }

    /// Leave the line on screen as typed, end the session and put the terminal back.
    fn finish(&mut self, session: &mut TerminalSession, result: LineRead) -> LineRead {
        self.state.mode = ModeState::Insert;
        self.state.tips.clear();
        self.state.dot = self.state.buffer.len();
        self.state.rprompt.clear();
        self.analyzer.analyze(&mut self.state, false);

        let mut finish_error = None;
        {
            let mut out = self.output_device.lock();
            let rendered = self
                .renderer
                .render(&mut self.state, false, &mut *out)
                .and_then(|()| out.write_all(b"\n"))
                .and_then(|()| out.flush());
            if let Err(err) = rendered {
                finish_error = Some(LineEditorError::Render(err));
            }
            self.event_source.quit();
            if let Err(err) = session.finish(&mut *out) {
                tracing::error!(message = "can't restore terminal", ?err);
                finish_error = LineEditorError::aggregate(finish_error, Some(err.into()));
            }
        }
        self.state.active = false;
        self.state.saved_termios = None;

        match (result, finish_error) {
            (result, None) => result,
            (LineRead::Error(err), Some(finish_error)) => {
                LineRead::Error(err.combine(finish_error))
            }
            // The line is already in history.
            (_, Some(finish_error)) => LineRead::Error(finish_error),
        }
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        if let Some(listener) = self.signal_listener.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AUTOWRAP_ON, HistoryStore, MockTerminalDevice, ModifierKeysMask, OutputDeviceExt,
                SpecialKey, StdoutMock, TerminalAttributeError, TerminalAttributes, keypress};
    use pretty_assertions::assert_eq;

    fn enter() -> KeyPress { keypress!(@special SpecialKey::Enter) }

    fn new_editor(
        device: Arc<MockTerminalDevice>,
    ) -> (Editor, crate::EventSenders, Arc<InMemoryHistory>, StdoutMock) {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let history = Arc::new(InMemoryHistory::default());
        let (editor, senders) = Editor::new_with_channels(device, output_device);
        let editor = editor
            .with_history(history.clone())
            .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])));
        (editor, senders, history, stdout_mock)
    }

    fn new_counted_editor(
        device: Arc<MockTerminalDevice>,
    ) -> (Editor, crate::EventSenders, Arc<InMemoryHistory>, crate::SourceLifecycle) {
        let (output_device, _) = OutputDevice::new_mock();
        let history = Arc::new(InMemoryHistory::default());
        let (event_source, senders) = ChannelEventSource::new();
        let lifecycle = event_source.lifecycle();
        let editor = Editor::new(device, output_device, Box::new(event_source))
            .with_history(history.clone())
            .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])));
        (editor, senders, history, lifecycle)
    }

    async fn type_keys(senders: &crate::EventSenders, text: &str) {
        for ch in text.chars() {
            senders.keys.send(keypress!(@char ch)).await.unwrap();
        }
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_typed_line_is_returned_and_recorded() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, history, stdout_mock) = new_editor(device.clone());
        type_keys(&senders, "ls -l").await;
        senders.keys.send(enter()).await.unwrap();

        let result = editor.read_line().await;

        assert!(matches!(&result, LineRead::Line(line) if line == "ls -l"));
        assert_eq!(history.all_commands().len(), 1);
        assert_eq!(device.current_attributes(), TerminalAttributes::cooked());
        assert!(!editor.state().active);
        assert!(editor.state().saved_termios.is_none());
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string()
                .ends_with(&format!("\n{AUTOWRAP_ON}"))
        );
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_eof_and_empty_lines_are_not_recorded() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, history, _) = new_editor(device);

        senders.keys.send(enter()).await.unwrap();
        let result = editor.read_line().await;
        assert!(matches!(&result, LineRead::Line(line) if line.is_empty()));

        let ctrl_d = keypress!(@char ModifierKeysMask::new().with_ctrl(), 'D');
        senders.keys.send(ctrl_d).await.unwrap();
        let result = editor.read_line().await;
        assert!(matches!(result, LineRead::Eof));

        assert!(history.is_empty());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_reprocessed_key_is_looked_up_in_new_mode() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, _, _) = new_editor(device);
        // Esc switches to command mode and hands the key over to command mode, where it
        // is bound to start-insert.
        let module = editor.module();
        module
            .binding(crate::Mode::Insert)
            .set(
                &ScriptValue::Str("Esc".into()),
                ScriptValue::callable("to-command", |ctx| {
                    ctx.state.mode = ModeState::Command;
                    ctx.state.set_next_action(NextAction::ReprocessKey);
                    Ok(())
                }),
            )
            .unwrap();
        module
            .binding(crate::Mode::Command)
            .set(
                &ScriptValue::Str("Esc".into()),
                ScriptValue::callable("insert-marker", |ctx| {
                    ctx.state.insert_at_dot("!");
                    ctx.state.mode = ModeState::Insert;
                    Ok(())
                }),
            )
            .unwrap();

        senders
            .keys
            .send(keypress!(@special SpecialKey::Esc))
            .await
            .unwrap();
        senders.keys.send(enter()).await.unwrap();

        let result = editor.read_line().await;
        assert!(matches!(&result, LineRead::Line(line) if line == "!"));
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_failing_user_function_becomes_notification() {
        let device = Arc::new(MockTerminalDevice::new(60));
        let (mut editor, senders, _, stdout_mock) = new_editor(device);
        editor
            .module()
            .binding(crate::Mode::Insert)
            .set(
                &ScriptValue::Str("Ctrl-X".into()),
                ScriptValue::callable("boom", |_| Err(miette::miette!("oops"))),
            )
            .unwrap();

        senders
            .keys
            .send(keypress!(@char ModifierKeysMask::new().with_ctrl(), 'X'))
            .await
            .unwrap();
        senders.keys.send(enter()).await.unwrap();

        assert!(matches!(editor.read_line().await, LineRead::Line(_)));
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("function error: oops")
        );
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_closed_key_channel_ends_read_with_error() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, _, _) = new_editor(device.clone());
        type_keys(&senders, "abc").await;
        drop(senders);

        let result = editor.read_line().await;

        assert!(matches!(
            result,
            LineRead::Error(LineEditorError::EventSourcesClosed)
        ));
        assert_eq!(device.current_attributes(), TerminalAttributes::cooked());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_restore_failure_is_combined_with_read_error() {
        let device = Arc::new(MockTerminalDevice::new(40).with_failing_set_call(1));
        let (mut editor, senders, _, _) = new_editor(device);
        drop(senders);

        let result = editor.read_line().await;

        let LineRead::Error(LineEditorError::Multiple(errors)) = result else {
            panic!("expected multiple errors, got {result:?}");
        };
        assert!(matches!(errors[0], LineEditorError::EventSourcesClosed));
        assert!(matches!(
            errors[1],
            LineEditorError::TerminalAttribute(TerminalAttributeError::Restore(_))
        ));
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_restore_failure_after_line_is_the_result() {
        let device = Arc::new(MockTerminalDevice::new(40).with_failing_set_call(1));
        let (mut editor, senders, history, _) = new_editor(device);
        type_keys(&senders, "pwd").await;
        senders.keys.send(enter()).await.unwrap();

        let result = editor.read_line().await;

        assert!(matches!(
            result,
            LineRead::Error(LineEditorError::TerminalAttribute(
                TerminalAttributeError::Restore(_)
            ))
        ));
        assert_eq!(history.all_commands()[0].text, "pwd");
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_start_failure_touches_nothing() {
        let device = Arc::new(MockTerminalDevice::new(40).with_failing_get());
        let (mut editor, _senders, _, stdout_mock) = new_editor(device);

        let result = editor.read_line().await;

        assert!(matches!(
            result,
            LineRead::Error(LineEditorError::TerminalAttribute(
                TerminalAttributeError::Read(_)
            ))
        ));
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
        assert!(!editor.state().active);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_event_source_runs_and_quits_once_per_read() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, _, lifecycle) = new_counted_editor(device);

        type_keys(&senders, "ls").await;
        senders.keys.send(enter()).await.unwrap();
        assert!(matches!(editor.read_line().await, LineRead::Line(_)));
        assert_eq!((lifecycle.run_count(), lifecycle.quit_count()), (1, 1));

        drop(senders);
        assert!(matches!(
            editor.read_line().await,
            LineRead::Error(LineEditorError::EventSourcesClosed)
        ));
        assert_eq!((lifecycle.run_count(), lifecycle.quit_count()), (2, 2));
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_event_source_balanced_across_interrupt() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (editor, senders, history, lifecycle) = new_counted_editor(device);
        let signals = SignalHub::new();
        let mut editor = editor.with_signals(signals.clone());

        let feeder = tokio::spawn(async move {
            type_keys(&senders, "rm").await;
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            signals.send(EditorSignal::Interrupt);
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            type_keys(&senders, "ls").await;
            senders.keys.send(enter()).await.unwrap();
            senders
        });

        let result = editor.read_line().await;
        let _senders = feeder.await.unwrap();

        assert!(matches!(&result, LineRead::Line(line) if line == "ls"));
        assert_eq!(history.all_commands().len(), 1);
        assert_eq!((lifecycle.run_count(), lifecycle.quit_count()), (1, 1));
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_start_failure_never_runs_event_source() {
        let device = Arc::new(MockTerminalDevice::new(40).with_failing_get());
        let (mut editor, _senders, _, lifecycle) = new_counted_editor(device);

        assert!(matches!(editor.read_line().await, LineRead::Error(_)));
        assert_eq!(lifecycle.run_count(), 0);
        assert!(lifecycle.is_balanced());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_error_results_are_not_recorded() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, senders, history, _) = new_editor(device);
        editor
            .module()
            .binding(crate::Mode::Insert)
            .set(
                &ScriptValue::Str("Ctrl-X".into()),
                ScriptValue::callable("fail-read", |ctx| {
                    ctx.state.set_next_action(NextAction::ExitWithResult(LineRead::Error(
                        LineEditorError::EventSourcesClosed,
                    )));
                    Ok(())
                }),
            )
            .unwrap();

        type_keys(&senders, "make").await;
        senders
            .keys
            .send(keypress!(@char ModifierKeysMask::new().with_ctrl(), 'X'))
            .await
            .unwrap();
        let result = editor.read_line().await;
        assert!(matches!(
            result,
            LineRead::Error(LineEditorError::EventSourcesClosed)
        ));
        assert_eq!(editor.state().buffer, "make");

        type_keys(&senders, "abc").await;
        drop(senders);
        let result = editor.read_line().await;
        assert!(matches!(
            result,
            LineRead::Error(LineEditorError::EventSourcesClosed)
        ));

        assert!(history.is_empty());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_mode_without_table_gives_tip() {
        let device = Arc::new(MockTerminalDevice::new(60));
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let (editor, senders) = Editor::new_with_channels(device, output_device);
        let mut tables = BindingTables::with_defaults();
        tables.remove_table(crate::Mode::Command);
        let mut editor = editor
            .with_bindings(tables.into_shared())
            .with_external_lookup(Arc::new(PathLookup::with_dirs(vec![])));

        senders
            .keys
            .send(keypress!(@special SpecialKey::Esc))
            .await
            .unwrap();
        senders.keys.send(keypress!(@char 'x')).await.unwrap();
        drop(senders);

        editor.read_line().await;
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("No binding for current mode")
        );
    }

    #[test]
    fn test_call_builtin_outside_read() {
        let device = Arc::new(MockTerminalDevice::new(40));
        let (mut editor, _senders, _, _) = new_editor(device);
        assert_eq!(
            editor.call_builtin("move-dot-left", &[]),
            Err(BuiltinError::EditorInactive)
        );
    }
}
