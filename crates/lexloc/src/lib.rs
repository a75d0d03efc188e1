//! Start/end location tracking for tokens produced by a lexer.
//!
//! Arm a [`Capture`] before the host consumes a token and fire it afterwards,
//! or install the [`Plugin`] so every token the host emits is located
//! automatically:
//!
//! ```ignore
//! use lexloc::{plugin, Lex, Lexer};
//!
//! let mut lexer = Lexer::new("foo/bar");
//! lexer.capture("slash", r"^/")?.capture("text", r"^\w+")?;
//!
//! let mut lexer = plugin().install(lexer)?;
//! let token = lexer.advance()?.unwrap();
//! assert_eq!(token.range, Some([0, 3]));
//! ```

// Lets `#[derive(Locate)]` name `::lexloc` from inside this crate too.
extern crate self as lexloc;

use std::borrow::Cow;

pub mod capture;
pub mod emitter;
pub mod error;
pub mod host;
pub mod lexer;
pub mod locate;
pub mod location;
pub mod plugin;
pub mod token;

pub use capture::Capture;
pub use emitter::{Emitter, LOCATION_EVENT};
pub use error::{LexError, LocationError};
pub use host::{Host, HostKind, Lex};
pub use lexer::{Lexer, LexerOptions};
pub use lexloc_macros::Locate;
pub use locate::{Locate, DEFAULT_PROPERTY};
pub use location::{Location, Position};
pub use plugin::{Located, Plugin};
pub use token::Token;

/// Marks the host's current cursor as the start of a location stamped under
/// `loc`.
pub fn location<H: Host + ?Sized>(host: &H) -> Capture {
    Capture::arm(host)
}

/// Like [`location`], but the location is stamped under `property`.
pub fn location_as<H: Host + ?Sized>(property: impl Into<Cow<'static, str>>, host: &H) -> Capture {
    Capture::arm_as(property, host)
}

/// A plugin that stamps locations under `loc`.
pub fn plugin() -> Plugin {
    Plugin::default()
}

/// A plugin that stamps locations under `property`.
pub fn plugin_as(property: impl Into<Cow<'static, str>>) -> Plugin {
    Plugin::named(property)
}
