use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{emitter::Emitter, location::Position, locate::Locate};

/// What kind of object a host declares itself to be. Only lexers and
/// tokenizers can have the location plugin installed.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    Lexer,
    Tokenizer,
    Other,
}

impl HostKind {
    pub fn accepts_plugin(self) -> bool {
        matches!(self, HostKind::Lexer | HostKind::Tokenizer)
    }
}

/// Anything with a readable cursor that locations can be computed against.
pub trait Host {
    /// The token type this host produces and that locations are attached to.
    type Token: Locate;

    fn kind(&self) -> HostKind;

    /// The cursor as it is right now.
    fn cursor(&self) -> Position;

    /// Label naming the input, e.g. a file path.
    fn source(&self) -> Option<&str> {
        None
    }

    /// Where `location` events go. Hosts without one simply don't get events.
    fn emitter(&mut self) -> Option<&mut Emitter<Self::Token>> {
        None
    }
}

/// A host that produces tokens on demand.
///
/// Every method returns `Ok(None)` when nothing was produced.
pub trait Lex: Host {
    type Error;

    /// Tries to produce a token of one specific kind at the cursor.
    fn lex(&mut self, kind: &str) -> Result<Option<Self::Token>, Self::Error>;

    /// Produces the next token of whichever kind matches first.
    fn advance(&mut self) -> Result<Option<Self::Token>, Self::Error>;

    /// Calls [`Lex::advance`] until the input is exhausted.
    fn tokenize(&mut self) -> Result<Vec<Self::Token>, Self::Error> {
        let mut tokens = Vec::new();
        while let Some(token) = self.advance()? {
            tokens.push(token);
        }

        Ok(tokens)
    }
}

impl<H: Host + ?Sized> Host for &mut H {
    type Token = H::Token;

    fn kind(&self) -> HostKind {
        (**self).kind()
    }

    fn cursor(&self) -> Position {
        (**self).cursor()
    }

    fn source(&self) -> Option<&str> {
        (**self).source()
    }

    fn emitter(&mut self) -> Option<&mut Emitter<Self::Token>> {
        (**self).emitter()
    }
}

impl<L: Lex + ?Sized> Lex for &mut L {
    type Error = L::Error;

    fn lex(&mut self, kind: &str) -> Result<Option<Self::Token>, Self::Error> {
        (**self).lex(kind)
    }

    fn advance(&mut self) -> Result<Option<Self::Token>, Self::Error> {
        (**self).advance()
    }

    fn tokenize(&mut self) -> Result<Vec<Self::Token>, Self::Error> {
        (**self).tokenize()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::token::Token;

    /// Produces its whole output in one go and nothing one token at a time.
    struct Batch;

    impl Host for Batch {
        type Token = Token;

        fn kind(&self) -> HostKind {
            HostKind::Tokenizer
        }

        fn cursor(&self) -> Position {
            Position::default()
        }
    }

    impl Lex for Batch {
        type Error = Infallible;

        fn lex(&mut self, _kind: &str) -> Result<Option<Token>, Infallible> {
            Ok(None)
        }

        fn advance(&mut self) -> Result<Option<Token>, Infallible> {
            Ok(None)
        }

        fn tokenize(&mut self) -> Result<Vec<Token>, Infallible> {
            Ok(vec![Token::new("batch", "all")])
        }
    }

    fn tokenize_any<L: Lex>(mut lexer: L) -> Result<Vec<L::Token>, L::Error> {
        lexer.tokenize()
    }

    #[test]
    fn test_borrowed_host_keeps_its_tokenize() {
        let mut batch = Batch;

        assert_eq!(tokenize_any(&mut batch), Ok(vec![Token::new("batch", "all")]));
    }

    #[test]
    fn test_only_lexers_and_tokenizers_accept_the_plugin() {
        assert!(HostKind::Lexer.accepts_plugin());
        assert!(HostKind::Tokenizer.accepts_plugin());
        assert!(!HostKind::Other.accepts_plugin());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(HostKind::Tokenizer.to_string(), "tokenizer");
    }
}
