// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::broadcast;

pub const SIGNAL_CHANNEL_CAPACITY: usize = 16;

/// OS signals the read loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSignal {
    /// Start the read over with an empty buffer.
    Interrupt,
    /// Redraw.
    WindowChange,
    /// Ignored.
    Child,
    /// Shown as a tip, otherwise ignored.
    Other(i32),
}

impl std::fmt::Display for EditorSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorSignal::Interrupt => f.write_str("Interrupt"),
            EditorSignal::WindowChange => f.write_str("WindowChange"),
            EditorSignal::Child => f.write_str("Child"),
            EditorSignal::Other(number) => write!(f, "{number}"),
        }
    }
}

/// Process wide fan out of [`EditorSignal`]s. Every read subscribes for its own duration,
/// so signals that arrive between reads are not seen by anyone.
#[derive(Debug, Clone)]
pub struct SignalHub {
    sender: broadcast::Sender<EditorSignal>,
}

impl Default for SignalHub {
    fn default() -> Self { Self::new() }
}

impl SignalHub {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EditorSignal> { self.sender.subscribe() }

    /// Deliver `signal` to every current subscriber.
    pub fn send(&self, signal: EditorSignal) {
        // Nobody may be listening.
        self.sender.send(signal).ok();
    }

    /// Forward `SIGINT`, `SIGWINCH`, `SIGCHLD`, `SIGUSR1` and `SIGUSR2` to the hub until
    /// the returned task is aborted.
    ///
    /// # Errors
    ///
    /// Returns an error if a signal handler can't be installed.
    #[cfg(unix)]
    pub fn try_listen_to_os_signals(&self) -> miette::Result<tokio::task::JoinHandle<()>> {
        use miette::IntoDiagnostic;
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt = signal(SignalKind::interrupt()).into_diagnostic()?;
        let mut window_change = signal(SignalKind::window_change()).into_diagnostic()?;
        let mut child = signal(SignalKind::child()).into_diagnostic()?;
        let user_1 = SignalKind::user_defined1();
        let user_2 = SignalKind::user_defined2();
        let mut user_defined_1 = signal(user_1).into_diagnostic()?;
        let mut user_defined_2 = signal(user_2).into_diagnostic()?;

        let hub = self.clone();
        Ok(tokio::spawn(async move {
            loop {
                let editor_signal = tokio::select! {
                    Some(()) = interrupt.recv() => EditorSignal::Interrupt,
                    Some(()) = window_change.recv() => EditorSignal::WindowChange,
                    Some(()) = child.recv() => EditorSignal::Child,
                    Some(()) = user_defined_1.recv() => {
                        EditorSignal::Other(user_1.as_raw_value())
                    }
                    Some(()) = user_defined_2.recv() => {
                        EditorSignal::Other(user_2.as_raw_value())
                    }
                    else => break,
                };
                tracing::debug!(message = "received signal", %editor_signal);
                hub.send(editor_signal);
            }
        }))
    }
}
