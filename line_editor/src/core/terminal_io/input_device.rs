// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CrosstermEventResult, PinnedInputStream};
use crossterm::event::EventStream;
use futures_util::{FutureExt, StreamExt};

/// The raw crossterm event stream the editor reads keys and mouse reports from. See
/// [`crate::InputDeviceExtMock`] for testing features.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: PinnedInputStream<CrosstermEventResult>,
}

impl InputDevice {
    #[must_use]
    pub fn new_event_stream() -> InputDevice {
        InputDevice {
            resource: Box::pin(EventStream::new()),
        }
    }
}

impl InputDevice {
    /// Returns [None] once the underlying stream has ended.
    pub async fn next(&mut self) -> Option<CrosstermEventResult> {
        self.resource.next().fuse().await
    }
}
