// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{EVENT_CHANNEL_CAPACITY, EventChannels, EventSenders, EventSource,
            create_event_channels};
use crate::{InputDevice, Key, KeyPress, ModifierKeysMask, StdMutex, lock_or_panic};
use crossterm::event::Event;
use std::sync::Arc;
use tokio::{sync::oneshot, task::JoinHandle};

/// [`EventSource`] reading an [`InputDevice`] on a tokio task.
///
/// When the input stream ends, every sender is dropped so the key channel closes and the
/// read in progress can tell that no more keys will come.
pub struct CrosstermEventSource {
    input_device: Arc<tokio::sync::Mutex<InputDevice>>,
    channels: EventChannels,
    /// [None] once the input stream has ended.
    safe_senders: Arc<StdMutex<Option<EventSenders>>>,
    running: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl std::fmt::Debug for CrosstermEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermEventSource")
            .field("running", &self.running.is_some())
            .finish_non_exhaustive()
    }
}

impl CrosstermEventSource {
    #[must_use]
    pub fn new(input_device: InputDevice) -> Self {
        let (senders, channels) = create_event_channels(EVENT_CHANNEL_CAPACITY);
        Self {
            input_device: Arc::new(tokio::sync::Mutex::new(input_device)),
            channels,
            safe_senders: Arc::new(StdMutex::new(Some(senders))),
            running: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }
}

impl EventSource for CrosstermEventSource {
    fn run(&mut self) {
        if self.is_running() {
            return;
        }
        let Some(senders) = lock_or_panic!(self.safe_senders).clone() else {
            tracing::debug!(message = "input stream already ended, not starting reader");
            return;
        };

        let (shutdown_sender, mut shutdown_receiver) = oneshot::channel::<()>();
        let input_device = self.input_device.clone();
        let safe_senders = self.safe_senders.clone();

        let handle = tokio::spawn(async move {
            let mut input_device = input_device.lock().await;
            loop {
                tokio::select! {
                    // This branch is cancel safe because oneshot receivers are.
                    _ = &mut shutdown_receiver => break,

                    // This branch is cancel safe because StreamExt::next is.
                    maybe_event = input_device.next() => match maybe_event {
                        Some(Ok(event)) => route_event(&senders, event).await,
                        Some(Err(err)) => {
                            tracing::warn!(message = "error reading input", ?err);
                            // We don't care about the result of this operation.
                            senders.errors.send(err).await.ok();
                        }
                        None => {
                            tracing::debug!(message = "input stream ended");
                            lock_or_panic!(safe_senders).take();
                            break;
                        }
                    }
                }
            }
        });
        self.running = Some((shutdown_sender, handle));
    }

    fn quit(&mut self) {
        if let Some((shutdown_sender, _handle)) = self.running.take() {
            // The task may already be gone.
            shutdown_sender.send(()).ok();
        }
    }

    fn channels(&mut self) -> &mut EventChannels { &mut self.channels }
}

async fn route_event(senders: &EventSenders, event: Event) {
    match event {
        Event::Key(key_event) => {
            if let Ok(key) = KeyPress::try_from(key_event) {
                senders.keys.send(key).await.ok();
            }
        }
        Event::Mouse(mouse_event) => {
            senders.mouse.send(mouse_event).await.ok();
        }
        Event::Paste(text) => {
            for ch in text.chars().filter(|ch| !ch.is_control()) {
                let key = KeyPress::new(Key::Character(ch), ModifierKeysMask::new());
                senders.keys.send(key).await.ok();
            }
        }
        // Window changes arrive as signals. Focus changes are of no use.
        _ => {}
    }
}
