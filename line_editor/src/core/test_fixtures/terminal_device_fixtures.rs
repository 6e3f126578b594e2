// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{StdMutex, TerminalAttributes, TerminalDevice, lock_or_panic};
use std::{io,
          sync::atomic::{AtomicBool, AtomicUsize, Ordering}};

/// In memory [`TerminalDevice`] that starts out in cooked mode. Failures can be injected
/// for the attribute read and for the n-th attribute write (0 is the raw mode apply, 1
/// the restore).
#[derive(Debug)]
pub struct MockTerminalDevice {
    attributes: StdMutex<TerminalAttributes>,
    set_call_count: AtomicUsize,
    fail_get: AtomicBool,
    fail_set_call: Option<usize>,
    width: u16,
}

impl MockTerminalDevice {
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            attributes: StdMutex::new(TerminalAttributes::cooked()),
            set_call_count: AtomicUsize::new(0),
            fail_get: AtomicBool::new(false),
            fail_set_call: None,
            width,
        }
    }

    #[must_use]
    pub fn with_failing_get(self) -> Self {
        self.fail_get.store(true, Ordering::SeqCst);
        self
    }

    #[must_use]
    pub fn with_failing_set_call(mut self, call_index: usize) -> Self {
        self.fail_set_call = Some(call_index);
        self
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn current_attributes(&self) -> TerminalAttributes {
        lock_or_panic!(self.attributes).clone()
    }

    #[must_use]
    pub fn set_call_count(&self) -> usize { self.set_call_count.load(Ordering::SeqCst) }
}

impl TerminalDevice for MockTerminalDevice {
    fn get_attributes(&self) -> io::Result<TerminalAttributes> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"));
        }
        Ok(self.current_attributes())
    }

    fn set_attributes(&self, attributes: &TerminalAttributes) -> io::Result<()> {
        let call_index = self.set_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_set_call == Some(call_index) {
            return Err(io::Error::other("EIO"));
        }
        *lock_or_panic!(self.attributes) = attributes.clone();
        Ok(())
    }

    fn width(&self) -> u16 { self.width }
}
