// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnalysisError, NodeKind, Parser, Span, SyntaxNode, SyntaxTree};

/// Parser for the bundled shell syntax.
///
/// - Words are barewords, `'single quoted'` (a doubled `''` is a literal quote),
///   `"double quoted"` (backslash escapes) or `$variables`.
/// - `|`, `;` and newlines end a form. The first word of a form is its head.
/// - `#` at the start of a word comments out the rest of the line.
///
/// Errors about input that is merely unfinished (an open quote, a `$` with no name yet)
/// are positioned at the end of the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellParser;

fn is_word_end(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '|' | ';' | '\'' | '"' | ')' | ']' | '}')
}

fn is_variable_char(ch: char) -> bool { ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':') }

/// End of the single quoted string whose opening quote is at `begin`.
fn scan_single_quoted(source: &str, begin: usize) -> Result<usize, AnalysisError> {
    let mut offset = begin + 1;
    loop {
        let Some(quote) = source[offset..].find('\'') else {
            return Err(AnalysisError::at(
                "unterminated single-quoted string",
                Span::new(source.len(), source.len()),
            ));
        };
        offset += quote + 1;
        if source[offset..].starts_with('\'') {
            offset += 1;
        } else {
            return Ok(offset);
        }
    }
}

/// End of the double quoted string whose opening quote is at `begin`.
fn scan_double_quoted(source: &str, begin: usize) -> Result<usize, AnalysisError> {
    let mut chars = source[begin + 1..].char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '"' => return Ok(begin + 1 + index + 1),
            _ => {}
        }
    }
    Err(AnalysisError::at(
        "unterminated double-quoted string",
        Span::new(source.len(), source.len()),
    ))
}

fn scan_while(source: &str, begin: usize, predicate: impl Fn(char) -> bool) -> usize {
    source[begin..]
        .char_indices()
        .find(|(_, ch)| !predicate(*ch))
        .map_or(source.len(), |(index, _)| begin + index)
}

impl Parser for ShellParser {
    fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError> {
        let mut nodes = vec![];
        let mut is_form_start = true;
        let mut offset = 0;

        while let Some(ch) = source[offset..].chars().next() {
            let begin = offset;
            let (kind, end) = match ch {
                '\n' => {
                    is_form_start = true;
                    offset += 1;
                    continue;
                }
                _ if ch.is_whitespace() => {
                    offset += ch.len_utf8();
                    continue;
                }
                '#' => (NodeKind::Comment, scan_while(source, begin, |it| it != '\n')),
                '|' | ';' => (NodeKind::Separator, begin + 1),
                ')' | ']' | '}' => {
                    return Err(AnalysisError::at(
                        format!("unexpected {ch}"),
                        Span::new(begin, begin + 1),
                    ));
                }
                '\'' => (NodeKind::SingleQuoted, scan_single_quoted(source, begin)?),
                '"' => (NodeKind::DoubleQuoted, scan_double_quoted(source, begin)?),
                '$' => {
                    let end = scan_while(source, begin + 1, is_variable_char);
                    if end == begin + 1 {
                        return Err(AnalysisError::at(
                            "empty variable name",
                            Span::new(end, end),
                        ));
                    }
                    (NodeKind::Variable, end)
                }
                _ => (NodeKind::Bareword, scan_while(source, begin, |it| !is_word_end(it))),
            };

            let is_word = !matches!(kind, NodeKind::Separator | NodeKind::Comment);
            nodes.push(SyntaxNode {
                kind,
                span: Span::new(begin, end),
                is_form_head: is_word && is_form_start,
            });
            match kind {
                NodeKind::Separator => is_form_start = true,
                NodeKind::Comment => {}
                _ => is_form_start = false,
            }
            offset = end;
        }

        Ok(SyntaxTree {
            source: source.to_string(),
            nodes,
        })
    }
}
