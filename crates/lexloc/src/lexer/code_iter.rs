use crate::{
    host::{Host, HostKind},
    location::Position,
    token::Token,
};

/// Char cursor over an owned input that keeps index, line and column in step
/// with every character consumed.
///
/// A `CodeIter` is a cursor but not a lexer: locations can be computed against
/// it, but the location plugin refuses to install on it.
#[derive(Debug, Clone)]
pub struct CodeIter {
    current_position: Position,
    /// Byte offset matching `current_position.index`.
    offset: usize,
    source: String,
    label: Option<String>,
}

pub trait IntoCodeIterator {
    fn into_code_iterator(self, label: Option<String>) -> CodeIter;
}

impl IntoCodeIterator for String {
    /// The cursor starts at line 1, column 0.
    fn into_code_iterator(self, label: Option<String>) -> CodeIter {
        CodeIter {
            current_position: Position::default(),
            offset: 0,
            source: self,
            label,
        }
    }
}

impl IntoCodeIterator for &str {
    fn into_code_iterator(self, label: Option<String>) -> CodeIter {
        self.to_string().into_code_iterator(label)
    }
}

impl Iterator for CodeIter {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.peek()?;
        // "\r\n" is a single line break, counted on the '\n'.
        let breaks_line = is_line_terminator(c) && !(c == '\r' && self.peek_forward(1) == Some('\n'));

        self.offset += c.len_utf8();
        self.current_position.index += 1;

        if breaks_line {
            self.current_position.line += 1;
            self.current_position.column = 0;
        } else {
            self.current_position.column += 1;
        }

        Some(c)
    }
}

impl CodeIter {
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The char `n` places past the cursor, leaving the cursor where it is.
    pub fn peek_forward(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    /// Byte offset of the cursor into the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Everything not consumed yet.
    pub fn rest(&self) -> &str {
        &self.source[self.offset..]
    }

    pub fn input(&self) -> &str {
        &self.source
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Consumes characters until `len` bytes have been read, keeping the line
    /// and column counts in step.
    pub fn advance_bytes(&mut self, len: usize) {
        let target = (self.offset + len).min(self.source.len());
        while self.offset < target {
            if self.next().is_none() {
                break;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl Host for CodeIter {
    type Token = Token;

    fn kind(&self) -> HostKind {
        HostKind::Other
    }

    fn cursor(&self) -> Position {
        self.current_position
    }

    fn source(&self) -> Option<&str> {
        self.label()
    }
}
