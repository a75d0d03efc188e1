use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{host::HostKind, location::Position};

/// Raised when the location plugin is installed on something that is not a
/// lexer or tokenizer.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum LocationError {
    #[error("expected a lexer or tokenizer instance, got {kind} host `{host}`")]
    #[diagnostic(
        code(lexloc::invalid_host),
        help("only hosts whose kind is `lexer` or `tokenizer` can be located")
    )]
    InvalidHost { host: &'static str, kind: HostKind },
}

/// Errors raised by the reference [`crate::lexer::Lexer`]. Every error has a
/// specific character at which the lexer gives up; for unmatched input this
/// is carried as both a `Position` and a labelled span into the source.
#[derive(Error, Debug, Diagnostic)]
pub enum LexError {
    #[error("invalid pattern for `{kind}`")]
    #[diagnostic(code(lexloc::invalid_pattern))]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },

    #[error("no handler is registered for `{kind}`")]
    #[diagnostic(
        code(lexloc::unknown_kind),
        help("register one with `Lexer::capture` first")
    )]
    UnknownKind { kind: String },

    #[error("SyntaxError: unmatched input at {position}")]
    #[diagnostic(code(lexloc::unmatched_input))]
    Unmatched {
        position: Position,
        #[source_code]
        src: NamedSource,
        #[label("no handler matches here")]
        span: SourceSpan,
    },
}
