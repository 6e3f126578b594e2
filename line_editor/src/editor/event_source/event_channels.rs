// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyPress;
use crossterm::event::MouseEvent;
use tokio::sync::mpsc;

pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Receiving ends of the input channels. Each channel keeps its own order, there is no
/// ordering between channels.
#[derive(Debug)]
pub struct EventChannels {
    pub keys: mpsc::Receiver<KeyPress>,
    pub mouse: mpsc::Receiver<MouseEvent>,
    /// `(column, row)`, zero based.
    pub cursor_positions: mpsc::Receiver<(u16, u16)>,
    pub errors: mpsc::Receiver<std::io::Error>,
}

/// Sending ends of [`EventChannels`]. A channel closes once every clone of its sender is
/// dropped.
#[derive(Debug, Clone)]
pub struct EventSenders {
    pub keys: mpsc::Sender<KeyPress>,
    pub mouse: mpsc::Sender<MouseEvent>,
    pub cursor_positions: mpsc::Sender<(u16, u16)>,
    pub errors: mpsc::Sender<std::io::Error>,
}

#[must_use]
pub fn create_event_channels(capacity: usize) -> (EventSenders, EventChannels) {
    let (keys_sender, keys) = mpsc::channel(capacity);
    let (mouse_sender, mouse) = mpsc::channel(capacity);
    let (cursor_positions_sender, cursor_positions) = mpsc::channel(capacity);
    let (errors_sender, errors) = mpsc::channel(capacity);
    (
        EventSenders {
            keys: keys_sender,
            mouse: mouse_sender,
            cursor_positions: cursor_positions_sender,
            errors: errors_sender,
        },
        EventChannels {
            keys,
            mouse,
            cursor_positions,
            errors,
        },
    )
}

/// Decodes terminal input into [`EventChannels`]. The channels outlive a single read, so
/// keys typed between two reads are picked up by the next one.
pub trait EventSource: Send {
    /// Start decoding. Called at the start of every read.
    fn run(&mut self);

    /// Stop decoding. Called at the end of every read, before the terminal is restored.
    fn quit(&mut self);

    fn channels(&mut self) -> &mut EventChannels;
}
