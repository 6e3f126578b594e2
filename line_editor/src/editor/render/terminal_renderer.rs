// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt

use super::{Renderer, ScreenLayout, header_style, list_item_style, style_for_token,
            tip_style};
use crate::{EditorState, ModeState, SafeTerminalDevice, Span};
use crossterm::{QueueableCommand, cursor,
                style::{ContentStyle, Print},
                terminal::{Clear, ClearType}};
use std::{io::{self, Write},
          ops::Range};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Rows given to the list of candidates, entries or history lines.
pub const LIST_HEIGHT: usize = 8;

/// [`Renderer`] that draws with crossterm commands: the prompt and the styled buffer,
/// the right prompt, tips, then the list of the current mode. Everything is queued and
/// flushed once.
#[derive(Debug)]
pub struct TerminalRenderer {
    device: SafeTerminalDevice,
    /// Row of the cursor after the last render, relative to the prompt row.
    cursor_row: usize,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(device: SafeTerminalDevice) -> Self {
        Self {
            device,
            cursor_row: 0,
        }
    }
}

/// Rows of a list of `len` items to show so that `selected` is visible.
#[must_use]
pub fn visible_window(len: usize, selected: usize, height: usize) -> Range<usize> {
    if len <= height {
        return 0..len;
    }
    let start = selected.saturating_sub(height / 2).min(len - height);
    start..start + height
}

fn to_u16(it: usize) -> u16 { u16::try_from(it).unwrap_or(u16::MAX) }

fn strip_ansi(text: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(text)).into_owned()
}

/// Text shown in place of the buffer and where the cursor goes in it.
fn line_segments(state: &EditorState) -> (Vec<(String, ContentStyle)>, usize) {
    match &state.mode {
        ModeState::History(walk) => {
            (vec![(walk.line.clone(), ContentStyle::new())], walk.line.len())
        }
        ModeState::Completion(completion) => {
            let Span { begin, end } = completion.span;
            match completion.selected_candidate() {
                Some(candidate) if begin <= end && end <= state.buffer.len() => {
                    let mut selected = ContentStyle::new();
                    selected.attributes.set(crossterm::style::Attribute::Underlined);
                    (
                        vec![
                            (state.buffer[..begin].to_string(), ContentStyle::new()),
                            (candidate.text.clone(), selected),
                            (state.buffer[end..].to_string(), ContentStyle::new()),
                        ],
                        begin + candidate.text.len(),
                    )
                }
                _ => (vec![(state.buffer.clone(), ContentStyle::new())], state.dot),
            }
        }
        _ => {
            let tokens_cover_buffer = state.tokens.last().map(|it| it.span.end)
                == Some(state.buffer.len())
                && state.tokens.first().map(|it| it.span.begin) == Some(0);
            if tokens_cover_buffer {
                let segments = state
                    .tokens
                    .iter()
                    .map(|token| (token.text.clone(), style_for_token(token)))
                    .collect();
                (segments, state.dot)
            } else {
                (vec![(state.buffer.clone(), ContentStyle::new())], state.dot)
            }
        }
    }
}

/// Header and list rows of the current mode, with the selected row.
fn mode_list(state: &EditorState) -> Option<(String, Vec<String>, usize)> {
    match &state.mode {
        ModeState::Insert => None,
        ModeState::Command => Some((" COMMAND ".into(), vec![], 0)),
        ModeState::Completion(completion) => Some((
            " COMPLETING ".into(),
            completion
                .candidates
                .iter()
                .map(|it| it.display.clone())
                .collect(),
            completion.selected,
        )),
        ModeState::Navigation(navigation) => Some((
            format!(" NAVIGATING {} ", navigation.dir.display()),
            navigation
                .entries
                .iter()
                .map(|it| {
                    if it.is_dir {
                        format!("{}/", it.name)
                    } else {
                        it.name.clone()
                    }
                })
                .collect(),
            navigation.selected,
        )),
        ModeState::History(walk) => Some((format!(" HISTORY #{} ", walk.seq), vec![], 0)),
        ModeState::HistoryListing(listing) => {
            let header = if listing.filter.is_empty() {
                " HISTORY LISTING ".to_string()
            } else {
                format!(" HISTORY LISTING {} ", listing.filter)
            };
            let lines = listing
                .filtered()
                .iter()
                .map(|it| format!("{:>5} {}", it.seq, it.text))
                .collect();
            Some((header, lines, listing.selected))
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(
        &mut self,
        state: &mut EditorState,
        full_redraw: bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        // Go back to where the last render started and clear it.
        if full_redraw {
            out.queue(Clear(ClearType::All))?.queue(cursor::MoveTo(0, 0))?;
        } else {
            out.queue(cursor::MoveToColumn(0))?;
            // MoveUp(0) still moves one row.
            if self.cursor_row > 0 {
                out.queue(cursor::MoveUp(to_u16(self.cursor_row)))?;
            }
        }
        out.queue(Clear(ClearType::FromCursorDown))?;

        // Notifications scroll away above the prompt.
        for notification in state.notifications.drain(..) {
            out.queue(Print(notification))?.queue(Print("\r\n"))?;
        }

        let mut layout = ScreenLayout::new(out, self.device.width());
        layout.print(&strip_ansi(&state.prompt), ContentStyle::new())?;

        let (segments, cursor_offset) = line_segments(state);
        let mut cursor = (layout.row, layout.col);
        let mut offset = 0;
        for (text, style) in &segments {
            if (offset..offset + text.len()).contains(&cursor_offset) {
                let split_at = cursor_offset - offset;
                let (before, after) = text.split_at(split_at);
                layout.print(before, *style)?;
                cursor = (layout.row, layout.col);
                // A grapheme at the dot that doesn't fit is printed on the next row.
                let dot_width = after
                    .graphemes(true)
                    .next()
                    .filter(|it| !it.contains('\n'))
                    .map_or(0, UnicodeWidthStr::width);
                if dot_width > 0 && cursor.1 + dot_width > layout.width() {
                    cursor = (cursor.0 + 1, 0);
                }
                layout.print(after, *style)?;
            } else {
                layout.print(text, *style)?;
            }
            offset += text.len();
        }
        if cursor_offset >= offset {
            cursor = (layout.row, layout.col);
        }
        if cursor.1 >= layout.width() {
            // Cursor after a full row goes to the start of the next one.
            if layout.row == cursor.0 {
                layout.newline()?;
            }
            cursor = (cursor.0 + 1, 0);
        }

        let rprompt = strip_ansi(&state.rprompt);
        let rprompt_width = rprompt.width();
        if rprompt_width > 0 && layout.remaining() > rprompt_width + 1 {
            let column = layout.width() - rprompt_width;
            layout.out().queue(cursor::MoveToColumn(to_u16(column)))?;
            layout.out().queue(Print(&rprompt))?;
            layout.col = layout.width();
        }

        for tip in &state.tips {
            layout.print_line(tip, tip_style())?;
        }

        if let Some((header, lines, selected)) = mode_list(state) {
            layout.print_line(&header, header_style())?;
            for index in visible_window(lines.len(), selected, LIST_HEIGHT) {
                layout.print_line(&lines[index], list_item_style(index == selected))?;
            }
        }

        // Put the cursor at the dot.
        let (cursor_row, cursor_col) = cursor;
        let rows_below = layout.row.saturating_sub(cursor_row);
        let out = layout.out();
        if rows_below > 0 {
            out.queue(cursor::MoveUp(to_u16(rows_below)))?;
        }
        out.queue(cursor::MoveToColumn(to_u16(cursor_col)))?;
        out.flush()?;

        self.cursor_row = cursor_row;
        Ok(())
    }

    fn reset(&mut self) { self.cursor_row = 0; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Candidate, CompletionState, HistoryWalkState, LiveAnalyzer,
                MockTerminalDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn render_to_string(renderer: &mut TerminalRenderer, state: &mut EditorState) -> String {
        let mut out: Vec<u8> = vec![];
        renderer.render(state, false, &mut out).unwrap();
        String::from_utf8_lossy(&strip_ansi_escapes::strip(&out)).replace('\r', "")
    }

    fn renderer(width: u16) -> TerminalRenderer {
        TerminalRenderer::new(Arc::new(MockTerminalDevice::new(width)))
    }

    #[test]
    fn test_visible_window() {
        assert_eq!(visible_window(3, 2, 8), 0..3);
        assert_eq!(visible_window(20, 0, 8), 0..8);
        assert_eq!(visible_window(20, 10, 8), 6..14);
        assert_eq!(visible_window(20, 19, 8), 12..20);
    }

    #[test]
    fn test_prompt_buffer_rprompt_and_tips() {
        let mut state = EditorState::new_active();
        state.prompt = "> ".into();
        state.rprompt = "~/src".into();
        state.set_buffer("echo 'hi'");
        state.add_tip("a tip");
        LiveAnalyzer::default().analyze(&mut state, false);

        let output = render_to_string(&mut renderer(40), &mut state);

        assert_eq!(output, "> echo 'hi'~/src\na tip");
    }

    #[test]
    fn test_notifications_are_drained_above_the_prompt() {
        let mut state = EditorState::new_active();
        state.prompt = "$ ".into();
        state.notify("function error: oops");
        let mut renderer = renderer(40);

        let output = render_to_string(&mut renderer, &mut state);
        assert_eq!(output, "function error: oops\n$ ");
        assert!(state.notifications.is_empty());

        let output = render_to_string(&mut renderer, &mut state);
        assert_eq!(output, "$ ");
    }

    #[test]
    fn test_long_buffer_wraps_and_cursor_row_is_tracked() {
        let mut state = EditorState::new_active();
        state.prompt = "> ".into();
        state.set_buffer("0123456789abc");
        let mut renderer = renderer(8);

        let output = render_to_string(&mut renderer, &mut state);

        assert_eq!(output, "> 012345\n6789abc");
        assert_eq!(renderer.cursor_row, 1);
        renderer.reset();
        assert_eq!(renderer.cursor_row, 0);
    }

    #[test]
    fn test_cursor_follows_wide_grapheme_onto_next_row() {
        let mut state = EditorState::new_active();
        state.prompt = "> ".into();
        state.set_buffer("abcde界");
        state.dot = 5;
        let mut renderer = renderer(8);
        let mut out: Vec<u8> = vec![];

        renderer.render(&mut state, false, &mut out).unwrap();

        let raw = String::from_utf8_lossy(&out).into_owned();
        let text = String::from_utf8_lossy(&strip_ansi_escapes::strip(&out)).replace('\r', "");
        assert_eq!(text, "> abcde\n界");
        assert_eq!(renderer.cursor_row, 1);
        assert!(raw.ends_with("\x1b[1G"), "{raw:?}");
        assert!(!raw.contains("\x1b[1A"), "{raw:?}");
    }

    #[test]
    fn test_completion_list_shows_provisional_buffer() {
        let mut state = EditorState::new_active();
        state.set_buffer("ls fo");
        state.mode = ModeState::Completion(CompletionState {
            candidates: vec![Candidate::new("foo"), Candidate::new("fob")],
            selected: 1,
            span: Span::new(3, 5),
        });

        let output = render_to_string(&mut renderer(40), &mut state);

        assert_eq!(output, "ls fob\n COMPLETING \nfoo\nfob");
    }

    #[test]
    fn test_history_mode_shows_matched_line() {
        let mut state = EditorState::new_active();
        state.set_buffer("ec");
        state.mode = ModeState::History(HistoryWalkState {
            prefix: "ec".into(),
            seq: 7,
            line: "echo seven".into(),
        });

        let output = render_to_string(&mut renderer(40), &mut state);

        assert_eq!(output, "echo seven\n HISTORY #7 ");
    }
}
