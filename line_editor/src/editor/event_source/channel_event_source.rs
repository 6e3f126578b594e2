// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{EVENT_CHANNEL_CAPACITY, EventChannels, EventSenders, EventSource,
            create_event_channels};
use std::sync::{Arc,
                atomic::{AtomicUsize, Ordering}};

/// Counts of the [`EventSource::run`] and [`EventSource::quit`] calls a
/// [`ChannelEventSource`] got. Clones share the counts, so a handle taken before the
/// source is boxed into an editor keeps observing it.
#[derive(Debug, Clone, Default)]
pub struct SourceLifecycle {
    runs: Arc<AtomicUsize>,
    quits: Arc<AtomicUsize>,
}

impl SourceLifecycle {
    #[must_use]
    pub fn run_count(&self) -> usize { self.runs.load(Ordering::SeqCst) }

    #[must_use]
    pub fn quit_count(&self) -> usize { self.quits.load(Ordering::SeqCst) }

    /// Whether every run has been matched by a quit.
    #[must_use]
    pub fn is_balanced(&self) -> bool { self.run_count() == self.quit_count() }
}

/// [`EventSource`] for embedders that decode input themselves: whatever is sent on the
/// [`EventSenders`] returned by [`Self::new`] reaches the read loop.
#[derive(Debug)]
pub struct ChannelEventSource {
    channels: EventChannels,
    lifecycle: SourceLifecycle,
}

impl ChannelEventSource {
    #[must_use]
    pub fn new() -> (Self, EventSenders) {
        let (senders, channels) = create_event_channels(EVENT_CHANNEL_CAPACITY);
        let it = Self {
            channels,
            lifecycle: SourceLifecycle::default(),
        };
        (it, senders)
    }

    #[must_use]
    pub fn lifecycle(&self) -> SourceLifecycle { self.lifecycle.clone() }
}

impl EventSource for ChannelEventSource {
    fn run(&mut self) { self.lifecycle.runs.fetch_add(1, Ordering::SeqCst); }

    fn quit(&mut self) { self.lifecycle.quits.fetch_add(1, Ordering::SeqCst); }

    fn channels(&mut self) -> &mut EventChannels { &mut self.channels }
}
