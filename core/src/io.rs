// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!

Basic I/O helpers for line-oriented text formats.

 */

use std::io::{self, BufRead};

/// This struct wraps a BufRead type to hand out one line at a time while
/// tracking how many lines have been consumed.
///
/// The text formats handled by antview are strict about which line comes
/// next, so error messages want to say where a problem occurred. The reader
/// can also give back the most recent line, which lets a parser look ahead
/// by one line without a separate peeking API.
#[derive(Debug)]
pub struct LineReader<R: BufRead> {
    inner: R,
    buf: String,
    line_number: u64,
    replay: bool,
    at_eof: bool,
}

impl<R: BufRead> LineReader<R> {
    /// Create a new LineReader that wraps the argument *inner*.
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            buf: String::new(),
            line_number: 0,
            replay: false,
            at_eof: false,
        }
    }

    /// Consume this struct, returning the underlying inner reader.
    ///
    /// A line given back with `unread` is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Return the 1-based number of the line most recently returned by
    /// `next_line`, or zero if nothing has been read yet.
    ///
    /// As with the byte offsets of a wrapped stream, this counts lines read
    /// since the struct was created, not since the start of the file.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next line, without its line terminator.
    ///
    /// Returns Ok(None) at EOF. Both `\n` and `\r\n` terminators are
    /// stripped.
    pub fn next_line(&mut self) -> io::Result<Option<&str>> {
        if self.replay {
            self.replay = false;
            self.line_number += 1;
            return Ok(Some(trim_terminator(&self.buf)));
        }

        if self.at_eof {
            return Ok(None);
        }

        self.buf.clear();

        if self.inner.read_line(&mut self.buf)? == 0 {
            self.at_eof = true;
            return Ok(None);
        }

        self.line_number += 1;
        Ok(Some(trim_terminator(&self.buf)))
    }

    /// Arrange for the line most recently returned by `next_line` to be
    /// returned again by the next call.
    ///
    /// Only one line of push-back is supported. Panics if there is no line
    /// to give back.
    pub fn unread(&mut self) {
        if self.replay || self.line_number == 0 || self.at_eof {
            panic!("no line available to unread");
        }

        self.replay = true;
        self.line_number -= 1;
    }
}

fn trim_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Split a line into whitespace-separated tokens, returning the first token
/// and an iterator over the rest.
///
/// Returns None for a line that is empty or all whitespace.
pub fn split_tag(line: &str) -> Option<(&str, std::str::SplitWhitespace<'_>)> {
    let mut tokens = line.split_whitespace();
    tokens.next().map(|tag| (tag, tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn line_numbers_and_terminators() {
        let mut r = LineReader::new(Cursor::new("one\r\ntwo\n\nthree"));
        assert_eq!(r.line_number(), 0);
        assert_eq!(r.next_line().unwrap(), Some("one"));
        assert_eq!(r.next_line().unwrap(), Some("two"));
        assert_eq!(r.next_line().unwrap(), Some(""));
        assert_eq!(r.next_line().unwrap(), Some("three"));
        assert_eq!(r.line_number(), 4);
        assert_eq!(r.next_line().unwrap(), None);
        assert_eq!(r.next_line().unwrap(), None);
        assert_eq!(r.line_number(), 4);
    }

    #[test]
    fn unread_replays_one_line() {
        let mut r = LineReader::new(Cursor::new("a\nb\n"));
        assert_eq!(r.next_line().unwrap(), Some("a"));
        r.unread();
        assert_eq!(r.line_number(), 0);
        assert_eq!(r.next_line().unwrap(), Some("a"));
        assert_eq!(r.line_number(), 1);
        assert_eq!(r.next_line().unwrap(), Some("b"));
        assert_eq!(r.next_line().unwrap(), None);
    }

    #[test]
    #[should_panic]
    fn unread_at_start_panics() {
        let mut r = LineReader::new(Cursor::new("a\n"));
        r.unread();
    }

    #[test]
    fn tags() {
        let (tag, rest) = split_tag("  ZEN: 0 90  5 ").unwrap();
        assert_eq!(tag, "ZEN:");
        assert_eq!(rest.collect::<Vec<_>>(), vec!["0", "90", "5"]);
        assert!(split_tag(" \t ").is_none());
    }
}
