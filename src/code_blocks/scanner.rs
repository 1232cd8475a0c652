//! Streaming fenced code block scanner.

use super::language::Language;
use super::linguist::language_tag;
use serde::Serialize;
use std::iter::FusedIterator;

/// A fenced code block found in a document.
///
/// Line numbers are 1-based. `start_line` is the opening fence and
/// `end_line` the closing fence, so `start_line < end_line` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Display path of the owning document.
    pub path: &'a str,
    /// Full info string after the opening fence, trimmed.
    pub info_string: &'a str,
    /// Language tag extracted from the info string. May be empty.
    pub tag: &'a str,
    pub start_line: usize,
    pub end_line: usize,
    /// Text between the fence lines, without the final line ending.
    pub content: &'a str,
    /// The fence character used (` or ~).
    pub fence_char: char,
    /// Length of the opening fence (3 or more).
    pub fence_length: usize,
}

/// A [`CodeBlock`] annotated with its normalized language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedBlock<'a> {
    pub block: CodeBlock<'a>,
    pub language: Language,
}

/// An opening fence with no matching closing fence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, thiserror::Error)]
#[error("{path}:{line}: unterminated code fence")]
pub struct MalformedBlock {
    pub path: String,
    /// 1-based line of the opening fence.
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset just past the line ending.
    end: usize,
    /// Line text without `\n` / `\r\n`.
    text: &'a str,
}

#[derive(Debug, Clone)]
struct Lines<'a> {
    content: &'a str,
    pos: usize,
    number: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }
        let rest = &self.content[self.pos..];
        let raw_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let raw = &rest[..raw_len];
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);

        self.number += 1;
        let line = Line {
            number: self.number,
            start: self.pos,
            end: self.pos + raw_len,
            text,
        };
        self.pos += raw_len;
        Some(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence<'a> {
    marker: char,
    length: usize,
    info: &'a str,
}

/// Widest indent a fence may have; four spaces make an indented code block.
const MAX_FENCE_INDENT: usize = 3;

/// Parse a line as a code fence, if it is one.
fn parse_fence(line: &str) -> Option<Fence<'_>> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > MAX_FENCE_INDENT {
        return None;
    }
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let length = trimmed.chars().take_while(|&c| c == marker).count();
    if length < 3 {
        return None;
    }
    // Both markers are ASCII, so `length` is also a byte count.
    let info = trimmed[length..].trim();
    // A backtick in a backtick fence's info string makes the line inline code.
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some(Fence { marker, length, info })
}

/// Closing is by marker and length only; a trailing tag does not keep the block open.
fn is_closing_fence(open: &Fence<'_>, line: &str) -> bool {
    parse_fence(line).is_some_and(|f| f.marker == open.marker && f.length >= open.length)
}

fn strip_line_ending(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

/// Lazily yields the fenced code blocks of one document in source order.
///
/// Each item is either a complete [`CodeBlock`] or a [`MalformedBlock`] for
/// an opening fence that is never closed. After a malformed block the rest of
/// the document is plain text and the scanner stops.
#[derive(Debug, Clone)]
pub struct BlockScanner<'a> {
    path: &'a str,
    content: &'a str,
    lines: Lines<'a>,
    finished: bool,
}

impl<'a> BlockScanner<'a> {
    /// A leading byte order mark is skipped; line numbers are unaffected.
    pub fn new(path: &'a str, content: &'a str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self {
            path,
            content,
            lines: Lines {
                content,
                pos: 0,
                number: 0,
            },
            finished: false,
        }
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Result<CodeBlock<'a>, MalformedBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(line) = self.lines.next() {
            let Some(open) = parse_fence(line.text) else {
                continue;
            };

            for inner in self.lines.by_ref() {
                if is_closing_fence(&open, inner.text) {
                    let content = strip_line_ending(&self.content[line.end.min(inner.start)..inner.start]);
                    return Some(Ok(CodeBlock {
                        path: self.path,
                        info_string: open.info,
                        tag: language_tag(open.info),
                        start_line: line.number,
                        end_line: inner.number,
                        content,
                        fence_char: open.marker,
                        fence_length: open.length,
                    }));
                }
            }

            self.finished = true;
            return Some(Err(MalformedBlock {
                path: self.path.to_string(),
                line: line.number,
            }));
        }

        self.finished = true;
        None
    }
}

impl FusedIterator for BlockScanner<'_> {}
