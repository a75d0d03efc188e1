use std::borrow::Cow;

use crate::{
    capture::Capture,
    emitter::Emitter,
    error::LocationError,
    host::{Host, HostKind, Lex},
    locate::DEFAULT_PROPERTY,
    location::Position,
};

/// Installs location tracking on a lexer or tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    property: Cow<'static, str>,
}

impl Default for Plugin {
    fn default() -> Self {
        Self::named(DEFAULT_PROPERTY)
    }
}

impl Plugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plugin whose captures stamp tokens under `property` by default.
    pub fn named(property: impl Into<Cow<'static, str>>) -> Self {
        Self {
            property: property.into(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Wraps `host` so that every token it emits is located.
    ///
    /// Fails if the host is neither a lexer nor a tokenizer.
    pub fn install<H: Host>(&self, host: H) -> Result<Located<H>, LocationError> {
        let kind = host.kind();
        if !kind.accepts_plugin() {
            return Err(LocationError::InvalidHost {
                host: std::any::type_name::<H>(),
                kind,
            });
        }

        tracing::debug!(%kind, property = %self.property, "installed location plugin");
        Ok(Located {
            host,
            property: self.property.clone(),
        })
    }
}

/// A host whose token-emitting methods attach a location to every token they
/// produce.
///
/// `Located` implements [`Lex`] with the same signatures as the host it wraps;
/// the only difference is the location side effect. Calls that produce no
/// token, or fail, leave nothing behind and fire no event.
#[derive(Debug)]
pub struct Located<H> {
    host: H,
    property: Cow<'static, str>,
}

impl<H: Host> Located<H> {
    /// The host's cursor right now.
    pub fn position(&self) -> Position {
        Position::of(&self.host)
    }

    /// Arms a capture under the plugin's property.
    pub fn location(&self) -> Capture {
        Capture::arm_as(self.property.clone(), &self.host)
    }

    /// Arms a capture under `property` instead of the plugin's.
    pub fn location_as(&self, property: impl Into<Cow<'static, str>>) -> Capture {
        Capture::arm_as(property, &self.host)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn get_ref(&self) -> &H {
        &self.host
    }

    pub fn get_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    /// Arms, runs `emit` against the host, and fires on whatever token comes
    /// back.
    fn located<E>(
        &mut self,
        emit: impl FnOnce(&mut H) -> Result<Option<H::Token>, E>,
    ) -> Result<Option<H::Token>, E> {
        let capture = self.location();
        let token = emit(&mut self.host)?;

        Ok(token.map(|token| capture.fire(&mut self.host, token)))
    }
}

impl<H: Host> Host for Located<H> {
    type Token = H::Token;

    fn kind(&self) -> HostKind {
        self.host.kind()
    }

    fn cursor(&self) -> Position {
        self.host.cursor()
    }

    fn source(&self) -> Option<&str> {
        self.host.source()
    }

    fn emitter(&mut self) -> Option<&mut Emitter<Self::Token>> {
        self.host.emitter()
    }
}

impl<L: Lex> Lex for Located<L> {
    type Error = L::Error;

    fn lex(&mut self, kind: &str) -> Result<Option<Self::Token>, Self::Error> {
        self.located(|host| host.lex(kind))
    }

    fn advance(&mut self) -> Result<Option<Self::Token>, Self::Error> {
        self.located(|host| host.advance())
    }
}
