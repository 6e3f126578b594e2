// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{OutputDevice, StdMutex, lock_or_panic};
use std::{io::{Result, Write},
          sync::Arc};
use strip_ansi_escapes::strip;

/// You can safely clone this struct, since it only contains an `Arc<StdMutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned.
///
/// The main constructors are:
/// - [`StdoutMock::default`]
/// - [`OutputDeviceExt::new_mock()`]
#[derive(Clone, Default, Debug)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { lock_or_panic!(self.buffer).clone() }

    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&lock_or_panic!(self.buffer)).into_owned()
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let stripped = strip(lock_or_panic!(self.buffer).as_slice());
        String::from_utf8_lossy(&stripped).into_owned()
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn clear(&self) { lock_or_panic!(self.buffer).clear(); }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        lock_or_panic!(self.buffer).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

pub trait OutputDeviceExt {
    fn new_mock() -> (OutputDevice, StdoutMock);
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
        };
        (this, stdout_mock)
    }
}
