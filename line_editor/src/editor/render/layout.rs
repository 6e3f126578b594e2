// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{QueueableCommand,
                style::{ContentStyle, Print, PrintStyledContent}};
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Queues text on `out` while keeping track of where the cursor ends up. Autowrap is off
/// during a read, so wrapping happens here: a grapheme that does not fit on the current
/// row starts the next one.
pub struct ScreenLayout<'a> {
    out: &'a mut dyn Write,
    width: usize,
    /// Relative to the row the layout started on.
    pub row: usize,
    pub col: usize,
}

impl std::fmt::Debug for ScreenLayout<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenLayout")
            .field("width", &self.width)
            .field("row", &self.row)
            .field("col", &self.col)
            .finish_non_exhaustive()
    }
}

impl<'a> ScreenLayout<'a> {
    pub fn new(out: &'a mut dyn Write, width: u16) -> Self {
        Self {
            out,
            width: usize::from(width.max(1)),
            row: 0,
            col: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize { self.width }

    #[must_use]
    pub fn remaining(&self) -> usize { self.width.saturating_sub(self.col) }

    pub fn out(&mut self) -> &mut dyn Write { &mut *self.out }

    /// # Errors
    ///
    /// Any write error.
    pub fn newline(&mut self) -> io::Result<()> {
        self.out.queue(Print("\r\n"))?;
        self.row += 1;
        self.col = 0;
        Ok(())
    }

    /// Print `text`, wrapping onto new rows as needed. A `\n` in `text` starts a new row.
    ///
    /// # Errors
    ///
    /// Any write error.
    pub fn print(&mut self, text: &str, style: ContentStyle) -> io::Result<()> {
        for grapheme in text.graphemes(true) {
            if grapheme == "\n" || grapheme == "\r\n" {
                self.newline()?;
                continue;
            }
            let grapheme_width = grapheme.width();
            if grapheme_width > 0 && self.col + grapheme_width > self.width {
                self.newline()?;
            }
            self.out.queue(PrintStyledContent(style.apply(grapheme)))?;
            self.col += grapheme_width;
        }
        Ok(())
    }

    /// Start a new row and print `text` on it, cut off at the terminal width.
    ///
    /// # Errors
    ///
    /// Any write error.
    pub fn print_line(&mut self, text: &str, style: ContentStyle) -> io::Result<()> {
        self.newline()?;
        let mut acc = String::new();
        for grapheme in text.graphemes(true) {
            let grapheme_width = grapheme.width();
            if self.col + grapheme_width > self.width || grapheme.contains('\n') {
                break;
            }
            acc.push_str(grapheme);
            self.col += grapheme_width;
        }
        self.out.queue(PrintStyledContent(style.apply(acc)))?;
        Ok(())
    }
}
