use miette::NamedSource;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    emitter::Emitter,
    error::LexError,
    host::{Host, HostKind, Lex},
    location::Position,
    token::Token,
};

use self::code_iter::{CodeIter, IntoCodeIterator};

pub mod code_iter;

/// Lexer options, deserializable from JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LexerOptions {
    /// Label naming the input, copied into every location.
    pub source: Option<String>,
    /// Whether `location` events reach listeners registered with
    /// [`Lexer::on`]. Turning this off leaves the lexer without an emitter.
    pub emit_events: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            source: None,
            emit_events: true,
        }
    }
}

#[derive(Debug)]
struct Handler {
    kind: String,
    pattern: Regex,
}

/// Regex-driven lexer. Handlers are tried in registration order, and each
/// must match at the very start of the remaining input: patterns are anchored
/// when they are registered, so `/` and `^/` behave the same.
///
/// ```ignore
/// let mut lexer = Lexer::new("foo/bar");
/// lexer.capture("slash", r"^/")?.capture("text", r"^\w+")?;
/// let tokens = lexer.tokenize()?;
/// ```
#[derive(Debug)]
pub struct Lexer {
    cursor: CodeIter,
    options: LexerOptions,
    handlers: Vec<Handler>,
    events: Emitter<Token>,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    pub fn with_options(input: impl Into<String>, options: LexerOptions) -> Self {
        Self {
            cursor: input.into().into_code_iterator(options.source.clone()),
            options,
            handlers: Vec::new(),
            events: Emitter::new(),
        }
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn input(&self) -> &str {
        self.cursor.input()
    }

    /// Replaces the input and rewinds the cursor. Handlers and listeners are
    /// kept.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.cursor = input.into().into_code_iterator(self.options.source.clone());
    }

    /// Registers a handler producing `kind` tokens from `pattern`. A kind that
    /// is already registered gets its pattern replaced in place.
    pub fn capture(&mut self, kind: impl Into<String>, pattern: &str) -> Result<&mut Self, LexError> {
        let kind = kind.into();
        // The bare pattern must parse on its own, so a stray `)` can't escape
        // the anchoring group.
        let pattern = Regex::new(pattern)
            .and_then(|_| Regex::new(&format!("^(?:{})", pattern)))
            .map_err(|source| LexError::InvalidPattern {
                kind: kind.clone(),
                source,
            })?;
        tracing::debug!(%kind, %pattern, "registered handler");

        match self.handlers.iter_mut().find(|handler| handler.kind == kind) {
            Some(handler) => handler.pattern = pattern,
            None => self.handlers.push(Handler { kind, pattern }),
        }

        Ok(self)
    }

    /// Registers handlers from `(kind, pattern)` pairs, in order.
    pub fn capture_all<'a>(
        &mut self,
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<&mut Self, LexError> {
        for (kind, pattern) in rules {
            self.capture(kind, pattern)?;
        }

        Ok(self)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|handler| handler.kind.as_str())
    }

    /// Listens for `event`. Listeners still register while events are
    /// disabled; they just never hear anything.
    pub fn on(&mut self, event: impl Into<String>, listener: impl FnMut(&Token) + 'static) -> &mut Self {
        self.events.on(event, listener);
        self
    }

    pub fn position(&self) -> Position {
        self.cursor.current_position()
    }

    pub fn is_eos(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Runs one handler at the cursor, consuming its match. Empty matches
    /// count as no match so the cursor always moves when a token comes back.
    fn run_handler(&mut self, index: usize) -> Option<Token> {
        let handler = &self.handlers[index];
        let found = handler.pattern.find(self.cursor.rest())?;
        if found.is_empty() {
            return None;
        }

        let token = Token::new(handler.kind.as_str(), found.as_str());
        let len = found.end();
        self.cursor.advance_bytes(len);

        Some(token)
    }

    fn unmatched(&self) -> LexError {
        let label = self.options.source.as_deref().unwrap_or("input");
        let len = self.cursor.peek().map(char::len_utf8).unwrap_or(0);

        LexError::Unmatched {
            position: self.position(),
            src: NamedSource::new(label, self.input().to_string()),
            span: (self.cursor.offset(), len).into(),
        }
    }
}

impl Host for Lexer {
    type Token = Token;

    fn kind(&self) -> HostKind {
        HostKind::Lexer
    }

    fn cursor(&self) -> Position {
        self.cursor.current_position()
    }

    fn source(&self) -> Option<&str> {
        self.options.source.as_deref()
    }

    fn emitter(&mut self) -> Option<&mut Emitter<Token>> {
        if self.options.emit_events {
            Some(&mut self.events)
        } else {
            None
        }
    }
}

impl Lex for Lexer {
    type Error = LexError;

    fn lex(&mut self, kind: &str) -> Result<Option<Token>, LexError> {
        let index = self
            .handlers
            .iter()
            .position(|handler| handler.kind == kind)
            .ok_or_else(|| LexError::UnknownKind {
                kind: kind.to_string(),
            })?;

        Ok(self.run_handler(index))
    }

    fn advance(&mut self) -> Result<Option<Token>, LexError> {
        if self.is_eos() {
            return Ok(None);
        }

        for index in 0..self.handlers.len() {
            if let Some(token) = self.run_handler(index) {
                return Ok(Some(token));
            }
        }

        Err(self.unmatched())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;

    fn slash_text(input: &str) -> Result<Lexer> {
        let mut lexer = Lexer::new(input);
        lexer.capture("slash", r"^/")?.capture("text", r"^\w+")?;
        Ok(lexer)
    }

    #[test]
    fn test_tokenize() -> Result<()> {
        let mut lexer = slash_text("foo/bar")?;

        assert_eq!(
            lexer.tokenize()?,
            vec![
                Token::new("text", "foo"),
                Token::new("slash", "/"),
                Token::new("text", "bar"),
            ]
        );
        assert!(lexer.is_eos());

        Ok(())
    }

    #[test]
    fn test_lex_specific_kind() -> Result<()> {
        let mut lexer = slash_text("foo/bar")?;

        assert_eq!(lexer.lex("slash")?, None);
        assert_eq!(lexer.position(), Position::default());

        assert_eq!(lexer.lex("text")?, Some(Token::new("text", "foo")));
        assert_eq!(lexer.position(), Position::new(3, 1, 3));

        Ok(())
    }

    #[test]
    fn test_lex_unknown_kind() -> Result<()> {
        let mut lexer = slash_text("foo")?;

        assert!(matches!(
            lexer.lex("star"),
            Err(LexError::UnknownKind { kind }) if kind == "star"
        ));

        Ok(())
    }

    #[test]
    fn test_invalid_pattern() {
        let mut lexer = Lexer::new("foo");
        let err = lexer.capture("broken", r"^(").unwrap_err();

        assert!(matches!(err, LexError::InvalidPattern { ref kind, .. } if kind == "broken"));

        let err = lexer.capture("escape", r"a)|(b").unwrap_err();
        assert!(matches!(err, LexError::InvalidPattern { ref kind, .. } if kind == "escape"));
    }

    #[test]
    fn test_unmatched_input() -> Result<()> {
        let mut lexer = slash_text("foo*")?;
        assert!(lexer.advance()?.is_some());

        match lexer.advance() {
            Err(LexError::Unmatched { position, span, .. }) => {
                assert_eq!(position, Position::new(3, 1, 3));
                assert_eq!(span.offset(), 3);
                assert_eq!(span.len(), 1);
            }
            other => panic!("expected unmatched input, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn test_unanchored_pattern_must_match_at_cursor() -> Result<()> {
        let mut lexer = Lexer::new("foo/bar");
        lexer.capture("slash", "/")?.capture("text", "[a-z]+")?;

        assert_eq!(lexer.lex("slash")?, None);
        assert_eq!(lexer.position().index, 0);

        let values: Vec<String> = lexer.tokenize()?.into_iter().map(|token| token.value).collect();
        assert_eq!(values, vec!["foo", "/", "bar"]);

        Ok(())
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() -> Result<()> {
        let mut lexer = Lexer::new("xa");
        lexer.capture("ab", "b|a")?;

        assert_eq!(lexer.lex("ab")?, None);
        assert_eq!(lexer.position().index, 0);

        Ok(())
    }

    #[test]
    fn test_empty_match_is_no_match() -> Result<()> {
        let mut lexer = Lexer::new("foo");
        lexer.capture("maybe", r"^x*")?;

        assert_eq!(lexer.lex("maybe")?, None);

        Ok(())
    }

    #[test]
    fn test_recapture_replaces_pattern() -> Result<()> {
        let mut lexer = Lexer::new("123");
        lexer.capture("text", r"^[a-z]+")?.capture("text", r"^\d+")?;

        assert_eq!(lexer.kinds().collect::<Vec<_>>(), vec!["text"]);
        assert_eq!(lexer.lex("text")?, Some(Token::new("text", "123")));

        Ok(())
    }

    #[test]
    fn test_set_input_rewinds() -> Result<()> {
        let mut lexer = slash_text("foo")?;
        lexer.tokenize()?;

        lexer.set_input("a/b");
        assert_eq!(lexer.position(), Position::default());
        assert_eq!(lexer.tokenize()?.len(), 3);

        Ok(())
    }

    #[test]
    fn test_options_from_json() -> Result<()> {
        let options: LexerOptions = serde_json::from_str(r#"{ "source": "string" }"#)?;
        assert_eq!(options.source.as_deref(), Some("string"));
        assert!(options.emit_events);

        let options: LexerOptions = serde_json::from_str(r#"{ "emitEvents": false }"#)?;
        assert_eq!(options.source, None);
        assert!(!options.emit_events);

        Ok(())
    }

    #[test]
    fn test_disabled_events_leave_no_emitter() {
        let mut lexer = Lexer::with_options(
            "",
            LexerOptions {
                emit_events: false,
                ..Default::default()
            },
        );

        assert!(lexer.emitter().is_none());
        assert_eq!(lexer.kind(), HostKind::Lexer);
    }
}
