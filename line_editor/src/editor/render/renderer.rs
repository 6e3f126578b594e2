// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::EditorState;
use std::io::{self, Write};

/// Draws the state of a read to the terminal.
pub trait Renderer: Send {
    /// Redraw everything below the prompt line and leave the cursor at the dot. Drains
    /// `state.notifications`.
    ///
    /// # Errors
    ///
    /// Any write error. The read is aborted then.
    fn render(
        &mut self,
        state: &mut EditorState,
        full_redraw: bool,
        out: &mut dyn Write,
    ) -> io::Result<()>;

    /// Forget what was drawn, the next render starts on a fresh line.
    fn reset(&mut self) {}
}
