//! Read physical lines and unfold them into content lines.
//!
//! Unfolding works on bytes, so a fold that splits a multi-octet character is
//! joined back together before the line is decoded as UTF-8. Blank lines are
//! skipped.

use std::{borrow::Cow, fmt, iter::Peekable, marker::PhantomData};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    #[error("Line {0}: Invalid UTF-8")]
    InvalidUtf8(usize),
    #[error("Line {0}: Line ends with a bare LF")]
    BareLineFeed(usize),
}

/// Split a byte slice on `\n`. A trailing `\r` is left on the line.
///
/// Input ending in `\n` yields a final empty line, so the last real line
/// still has a successor when its line ending is checked.
#[derive(Debug, Clone)]
pub struct BytesLines<'a>(Option<&'a [u8]>);

impl<'a> BytesLines<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self(Some(slice))
    }
}

impl<'a> Iterator for BytesLines<'a> {
    type Item = Cow<'a, [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.0?;
        match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                self.0 = Some(&rest[pos + 1..]);
                Some(Cow::Borrowed(&rest[..pos]))
            }
            None => {
                self.0 = None;
                Some(Cow::Borrowed(rest))
            }
        }
    }
}

/// An unfolded content line and the number of its first physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub inner: Cow<'a, str>,
    number: usize,
}

impl Line<'_> {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// 1-based number of the first physical line.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}: {}", self.number, self.inner)
    }
}

fn strip_cr(line: Cow<'_, [u8]>) -> (Cow<'_, [u8]>, bool) {
    match line {
        Cow::Borrowed(bytes) => match bytes.strip_suffix(b"\r") {
            Some(stripped) => (Cow::Borrowed(stripped), true),
            None => (Cow::Borrowed(bytes), false),
        },
        Cow::Owned(mut bytes) => {
            let had_cr = bytes.last() == Some(&b'\r');
            if had_cr {
                bytes.pop();
            }
            (Cow::Owned(bytes), had_cr)
        }
    }
}

#[inline]
fn is_continuation(line: &[u8]) -> bool {
    matches!(line.first(), Some(b' ' | b'\t'))
}

fn decode(bytes: Cow<'_, [u8]>, number: usize) -> Result<Cow<'_, str>, LineError> {
    match bytes {
        Cow::Borrowed(bytes) => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| LineError::InvalidUtf8(number)),
        Cow::Owned(bytes) => String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|_| LineError::InvalidUtf8(number)),
    }
}

/// Iterator over the unfolded content lines of an input.
pub struct LineReader<'a, I: Iterator<Item = Cow<'a, [u8]>>> {
    lines: Peekable<I>,
    number: usize,
    strict: bool,
    _lines: PhantomData<&'a [u8]>,
}

impl<'a> LineReader<'a, BytesLines<'a>> {
    pub fn from_slice(slice: &'a [u8]) -> Self {
        Self::new(BytesLines::new(slice))
    }
}

impl<'a, I: Iterator<Item = Cow<'a, [u8]>>> LineReader<'a, I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.peekable(),
            number: 0,
            strict: false,
            _lines: PhantomData,
        }
    }

    /// Reject physical lines terminated by a bare LF.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Next physical line without its line ending.
    fn next_physical(&mut self) -> Option<Result<Cow<'a, [u8]>, LineError>> {
        let line = self.lines.next()?;
        self.number += 1;
        let (line, had_cr) = strip_cr(line);
        // only the last line may lack a line ending
        if self.strict && !had_cr && self.lines.peek().is_some() {
            return Some(Err(LineError::BareLineFeed(self.number)));
        }
        Some(Ok(line))
    }

    fn next_is_continuation(&mut self) -> bool {
        self.lines
            .peek()
            .is_some_and(|line| is_continuation(line))
    }
}

impl<'a, I: Iterator<Item = Cow<'a, [u8]>>> Iterator for LineReader<'a, I> {
    type Item = Result<Line<'a>, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (number, mut content) = loop {
            let line = match self.next_physical()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let line = if is_continuation(&line) {
                // a continuation without anything to continue
                match line {
                    Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[1..]),
                    Cow::Owned(bytes) => Cow::Owned(bytes[1..].to_vec()),
                }
            } else {
                line
            };
            if !line.iter().all(u8::is_ascii_whitespace) {
                break (self.number, line);
            }
        };

        while self.next_is_continuation() {
            let line = match self.next_physical()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            content.to_mut().extend_from_slice(&line[1..]);
        }

        Some(decode(content, number).map(|inner| Line { inner, number }))
    }
}
