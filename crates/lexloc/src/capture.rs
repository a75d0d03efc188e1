use std::borrow::Cow;

use crate::{
    emitter::LOCATION_EVENT,
    host::Host,
    locate::{Locate, DEFAULT_PROPERTY},
    location::{Location, Position},
};

/// The start half of a location, waiting for its end.
///
/// Arm a capture right before the host consumes a token, then fire it with the
/// token once the host has moved past it:
///
/// ```ignore
/// let capture = Capture::arm(&lexer);
/// let token = lexer.lex("text")?;
/// let token = token.map(|token| capture.fire(&mut lexer, token));
/// ```
///
/// The start position lives in the capture itself, so any number of captures
/// may be outstanding against the same host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a capture does nothing until it is fired"]
pub struct Capture {
    start: Position,
    property: Cow<'static, str>,
}

impl Capture {
    /// Arms a capture that stamps tokens under the default `loc` property.
    pub fn arm<H: Host + ?Sized>(host: &H) -> Self {
        Self::arm_as(DEFAULT_PROPERTY, host)
    }

    /// Arms a capture that stamps tokens under `property`.
    pub fn arm_as<H: Host + ?Sized>(property: impl Into<Cow<'static, str>>, host: &H) -> Self {
        let start = Position::of(host);
        let property = property.into();
        tracing::trace!(%start, %property, "armed location capture");

        Self { start, property }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Builds the location from the armed start to the host's cursor now,
    /// without touching any token.
    pub fn location<H: Host + ?Sized>(&self, host: &H) -> Location {
        Location::from_host(self.start, Position::of(host), host)
    }

    /// Stamps `token` with a location ending at the host's current cursor,
    /// emits a `location` event if the host has an emitter, and hands the
    /// token back.
    ///
    /// A capture can be fired more than once; the end is re-read every time.
    pub fn fire<H: Host + ?Sized>(&self, host: &mut H, mut token: H::Token) -> H::Token {
        let location = self.location(&*host);
        tracing::trace!(%location, property = %self.property, "fired location capture");

        if !token.attach_location(&self.property, location) {
            tracing::warn!(
                property = %self.property,
                "token has no slot for the requested location property"
            );
        }

        if let Some(emitter) = host.emitter() {
            emitter.emit(LOCATION_EVENT, &token);
        }

        token
    }
}
