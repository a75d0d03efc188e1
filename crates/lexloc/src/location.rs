use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use crate::host::Host;

/// Represents the position of a single character in a source file.
///
/// Lines are 1-based and columns are 0-based: a fresh cursor sits at
/// `{ index: 0, line: 1, column: 0 }`, and the column drops back to `0` after
/// every line terminator. `index` counts characters, not bytes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub index: usize,
    pub column: usize,
    pub line: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            index: 0,
            column: 0,
            line: 1,
        }
    }
}

impl Position {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            column,
            line,
        }
    }

    /// Snapshots the host's cursor as it is right now.
    ///
    /// The numbers are copied as-is. A host with an inconsistent cursor gets
    /// an equally inconsistent position back.
    pub fn of<H: Host + ?Sized>(host: &H) -> Self {
        host.cursor()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents the location of a token in a source file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            source: None,
            start,
            end,
        }
    }

    pub fn with_source(start: Position, end: Position, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            start,
            end,
        }
    }

    /// Builds a location whose source label comes from the host's options.
    pub fn from_host<H: Host + ?Sized>(start: Position, end: Position, host: &H) -> Self {
        Self {
            source: host.source().map(str::to_owned),
            start,
            end,
        }
    }

    /// `[start.index, end.index]`, recomputed on every call.
    pub fn range(&self) -> [usize; 2] {
        [self.start.index, self.end.index]
    }

    /// Maps the character range onto byte offsets of `input`.
    ///
    /// Returns `None` when the range is reversed or runs past the end of the
    /// input.
    pub fn byte_range(&self, input: &str) -> Option<Range<usize>> {
        let [start, end] = self.range();
        if start > end {
            return None;
        }

        let mut offsets = input
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(input.len()));

        let start_byte = offsets.nth(start)?;
        let end_byte = if end == start {
            start_byte
        } else {
            offsets.nth(end - start - 1)?
        };

        Some(start_byte..end_byte)
    }

    /// The slice of `input` this location covers.
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.byte_range(input).map(|range| &input[range])
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}:", source)?;
        }
        write!(f, "{}-{}", self.start, self.end)
    }
}
