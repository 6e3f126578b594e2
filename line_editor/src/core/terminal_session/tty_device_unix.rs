// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios winsize

//! The controlling terminal, using rustix's safe termios API.

use crate::{DEFAULT_TERMINAL_WIDTH, TerminalAttributes, TerminalDevice};
use rustix::{fd::{AsFd, BorrowedFd},
             termios::{self, LocalModes, OptionalActions, SpecialCodeIndex}};
use std::{fs::File, io};

/// Represents either stdin or `/dev/tty` for terminal operations.
///
/// This enum allows us to handle both cases where stdin is a tty (normal terminal usage)
/// and where stdin is redirected (e.g., piped input), requiring us to use `/dev/tty`.
enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            TerminalFd::Stdin(stdin) => stdin.as_fd(),
            TerminalFd::DevTty(file) => file.as_fd(),
        }
    }
}

/// Stdin if it is a tty, otherwise `/dev/tty`.
fn get_terminal_fd() -> io::Result<TerminalFd> {
    let stdin = io::stdin();
    if termios::isatty(&stdin) {
        Ok(TerminalFd::Stdin(stdin))
    } else {
        let file = File::options().read(true).write(true).open("/dev/tty")?;
        Ok(TerminalFd::DevTty(file))
    }
}

/// The controlling terminal of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyDevice;

impl TerminalDevice for TtyDevice {
    fn get_attributes(&self) -> io::Result<TerminalAttributes> {
        let fd = get_terminal_fd()?;
        let termios = termios::tcgetattr(&fd)?;
        Ok(TerminalAttributes {
            canonical: termios.local_modes.contains(LocalModes::ICANON),
            echo: termios.local_modes.contains(LocalModes::ECHO),
            min_read_count: termios.special_codes[SpecialCodeIndex::VMIN],
            read_timeout: termios.special_codes[SpecialCodeIndex::VTIME],
            native: Some(termios),
        })
    }

    fn set_attributes(&self, attributes: &TerminalAttributes) -> io::Result<()> {
        let fd = get_terminal_fd()?;
        let mut termios = match &attributes.native {
            Some(it) => it.clone(),
            None => termios::tcgetattr(&fd)?,
        };
        termios
            .local_modes
            .set(LocalModes::ICANON, attributes.canonical);
        termios.local_modes.set(LocalModes::ECHO, attributes.echo);
        termios.special_codes[SpecialCodeIndex::VMIN] = attributes.min_read_count;
        termios.special_codes[SpecialCodeIndex::VTIME] = attributes.read_timeout;
        termios::tcsetattr(&fd, OptionalActions::Now, &termios)?;
        Ok(())
    }

    fn width(&self) -> u16 {
        get_terminal_fd()
            .ok()
            .and_then(|fd| termios::tcgetwinsize(&fd).ok())
            .map(|winsize| winsize.ws_col)
            .filter(|cols| *cols > 0)
            .unwrap_or(DEFAULT_TERMINAL_WIDTH)
    }
}
