// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex};
use std::sync::Arc;

/// Where rendered frames go: stdout for a real terminal, a [`crate::StdoutMock`] in
/// tests. Clones share the same writer.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
        }
    }

    /// Exclusive access to the writer. The guard must be dropped before the next
    /// `.await`.
    ///
    /// # Panics
    ///
    /// If an earlier holder of the lock panicked.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        crate::lock_or_panic!(self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_writer() {
        let device = OutputDevice::default();
        let clone = device.clone();
        assert!(Arc::ptr_eq(&device.resource, &clone.resource));
    }
}
