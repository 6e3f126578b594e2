// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SafeTerminalDevice, TerminalAttributeError, TerminalAttributes, ok};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

pub const AUTOWRAP_ON: &str = "\x1b[?7h";
pub const AUTOWRAP_OFF: &str = "\x1b[?7l";
/// Reverse video "⏎". Left visible when the previous output did not end with a newline.
pub const MISSING_EOL_MARKER: &str = "\x1b[7m\u{23CE}\x1b[m";
const MISSING_EOL_GLYPH: &str = "\u{23CE}";

/// Exclusive raw mode ownership of a terminal between [`Self::start`] and
/// [`Self::finish`]. Dropping an unfinished session still restores the snapshot.
#[derive(Debug)]
pub struct TerminalSession {
    device: SafeTerminalDevice,
    saved_attributes: Option<TerminalAttributes>,
}

impl TerminalSession {
    /// Snapshot the attributes of `device`, switch it to raw mode, then write the
    /// missing end of line probe to `out`.
    ///
    /// The probe re-enables autowrap, prints [`MISSING_EOL_MARKER`] padded to the full
    /// terminal width and returns to column 1 to erase it. When the cursor was already
    /// in column 1 the padding wraps onto the next line and the marker is erased; when
    /// it was not, the marker survives on the line with the unterminated output.
    /// Autowrap is then disabled, the renderer does its own wrapping.
    ///
    /// # Errors
    ///
    /// [`TerminalAttributeError::Read`] or [`TerminalAttributeError::Apply`].
    pub fn start(
        device: SafeTerminalDevice,
        out: &mut dyn Write,
    ) -> Result<Self, TerminalAttributeError> {
        let saved = device
            .get_attributes()
            .map_err(TerminalAttributeError::Read)?;
        device
            .set_attributes(&saved.to_raw())
            .map_err(TerminalAttributeError::Apply)?;

        let it = Self {
            device,
            saved_attributes: Some(saved),
        };
        it.write_missing_eol_probe(out);
        tracing::debug!(message = "terminal session started");
        Ok(it)
    }

    fn write_missing_eol_probe(&self, out: &mut dyn Write) {
        let width = usize::from(self.device.width());
        let padding = width.saturating_sub(MISSING_EOL_GLYPH.width());
        let result = write!(
            out,
            "{AUTOWRAP_ON}{MISSING_EOL_MARKER}{:padding$}\r \r{AUTOWRAP_OFF}",
            ""
        )
        .and_then(|()| out.flush());
        if let Err(err) = result {
            tracing::warn!(message = "failed to write end of line probe", ?err);
        }
    }

    /// Re-enable autowrap and restore the attributes saved by [`Self::start`]. Calling
    /// it again is a no-op.
    ///
    /// # Errors
    ///
    /// [`TerminalAttributeError::Restore`]. The snapshot is cleared either way.
    pub fn finish(&mut self, out: &mut dyn Write) -> Result<(), TerminalAttributeError> {
        let Some(saved) = self.saved_attributes.take() else {
            return ok!();
        };
        if let Err(err) = write!(out, "{AUTOWRAP_ON}").and_then(|()| out.flush()) {
            tracing::warn!(message = "failed to re-enable autowrap", ?err);
        }
        self.device
            .set_attributes(&saved)
            .map_err(TerminalAttributeError::Restore)?;
        tracing::debug!(message = "terminal session finished");
        ok!()
    }

    #[must_use]
    pub fn is_active(&self) -> bool { self.saved_attributes.is_some() }

    #[must_use]
    pub fn saved_attributes(&self) -> Option<&TerminalAttributes> {
        self.saved_attributes.as_ref()
    }

    #[must_use]
    pub fn device(&self) -> &SafeTerminalDevice { &self.device }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let Some(saved) = self.saved_attributes.take() else {
            return;
        };
        if let Err(err) = self.device.set_attributes(&saved) {
            tracing::error!(message = "failed to restore terminal on drop", ?err);
        }
    }
}
