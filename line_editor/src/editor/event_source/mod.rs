// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Everything the read loop waits on: decoded input from an [`EventSource`], OS signals
//! from the [`SignalHub`], and the one shot result of an [`ExternalCommandLookup`].

// Attach.
pub mod channel_event_source;
pub mod crossterm_event_source;
pub mod event_channels;
pub mod external_command_lookup;
pub mod signal_hub;

// Re-export.
pub use channel_event_source::*;
pub use crossterm_event_source::*;
pub use event_channels::*;
pub use external_command_lookup::*;
pub use signal_hub::*;
